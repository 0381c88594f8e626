//! Chooses between a caller-supplied token and ambient acquisition.

// self
use crate::{
	_prelude::*,
	auth::{AmbientCredentials, AuthToken, ScopeSet},
	error::TokenAcquisitionError,
};

const DEFAULT_CLIENT_SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/cloud-platform"];

/// Resolves exactly one [`AuthToken`] per invocation.
pub struct TokenResolver<A>
where
	A: ?Sized + AmbientCredentials,
{
	ambient: Arc<A>,
}
impl<A> TokenResolver<A>
where
	A: ?Sized + AmbientCredentials,
{
	/// Creates a resolver that falls back to `ambient` when no static token is configured.
	pub fn new(ambient: Arc<A>) -> Self {
		Self { ambient }
	}

	/// Returns the ambient provider.
	pub fn ambient(&self) -> &A {
		&self.ambient
	}

	/// Wraps a non-empty `access_token` as a static token, otherwise acquires one ambiently
	/// for the cloud-platform scope. Acquisition failures are returned as-is.
	pub async fn resolve(&self, access_token: Option<&str>) -> Result<AuthToken> {
		if let Some(token) = access_token.filter(|token| !token.is_empty()) {
			return Ok(AuthToken::static_bearer(token));
		}

		let scope = ScopeSet::new(DEFAULT_CLIENT_SCOPES).map_err(TokenAcquisitionError::from)?;
		let token = <A as AmbientCredentials>::acquire(self.ambient.as_ref(), &scope).await?;

		Ok(token)
	}
}
impl<A> Clone for TokenResolver<A>
where
	A: ?Sized + AmbientCredentials,
{
	fn clone(&self) -> Self {
		Self { ambient: self.ambient.clone() }
	}
}
impl<A> Debug for TokenResolver<A>
where
	A: ?Sized + AmbientCredentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenResolver(..)")
	}
}
