//! Invocation-scoped bearer tokens.

// self
use crate::_prelude::*;

/// Access token string that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerSecret(String);
impl BearerSecret {
	/// Returns the raw token. Keep it out of logs and progress output.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl From<String> for BearerSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for BearerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BearerSecret(<redacted>)")
	}
}
impl Display for BearerSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// How a bearer token was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSource {
	/// Supplied verbatim by the caller.
	Static,
	/// Acquired from the ambient cloud identity.
	Ambient,
}
impl TokenSource {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenSource::Static => "static",
			TokenSource::Ambient => "ambient",
		}
	}
}
impl Display for TokenSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Bearer credential resolved for exactly one outbound request.
///
/// Tokens are never cached; a new one is resolved for every invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthToken {
	/// Access token secret; callers must avoid logging it.
	pub secret: BearerSecret,
	/// Acquisition strategy.
	pub source: TokenSource,
	/// Expiry reported by the identity provider, if any.
	pub expires_at: Option<OffsetDateTime>,
}
impl AuthToken {
	/// Wraps a caller-supplied token; static tokens carry no expiry.
	pub fn static_bearer(secret: impl Into<String>) -> Self {
		Self {
			secret: BearerSecret::from(secret.into()),
			source: TokenSource::Static,
			expires_at: None,
		}
	}

	/// Wraps a token issued by an ambient identity provider.
	pub fn ambient(secret: impl Into<String>, expires_at: Option<OffsetDateTime>) -> Self {
		Self { secret: BearerSecret::from(secret.into()), source: TokenSource::Ambient, expires_at }
	}

	/// Value for the `Authorization` header.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}

/// Converts a relative `expires_in` (seconds) into an absolute instant.
pub(crate) fn expires_at_from_now(expires_in: Option<i64>) -> Option<OffsetDateTime> {
	expires_in
		.filter(|secs| *secs > 0)
		.map(|secs| OffsetDateTime::now_utc() + Duration::seconds(secs))
}
