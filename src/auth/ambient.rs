//! Ambient credential contracts and the Google Application Default Credentials provider.

pub mod google;

pub use google::*;

// self
use crate::{
	_prelude::*,
	auth::{AuthToken, ScopeSet},
	error::TokenAcquisitionError,
};

/// Future returned by [`AmbientCredentials::acquire`].
pub type AmbientFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AuthToken, TokenAcquisitionError>> + 'a + Send>>;

/// Source of bearer tokens derived from the surrounding execution environment.
///
/// Implementations must not cache tokens between calls; every call performs a fresh
/// acquisition for the provided scope set.
pub trait AmbientCredentials
where
	Self: Send + Sync,
{
	/// Acquires a token covering `scope`.
	fn acquire<'a>(&'a self, scope: &'a ScopeSet) -> AmbientFuture<'a>;
}
