//! Bearer tokens, scope sets, and the resolver choosing between static and ambient credentials.

pub mod ambient;
pub mod resolver;
pub mod scope;
pub mod token;

pub use ambient::*;
pub use resolver::*;
pub use scope::*;
pub use token::*;
