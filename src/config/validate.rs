//! Semantic validation of configuration fields.

// self
use crate::{_prelude::*, error::ConfigError};

/// HTTP methods a provisioner may issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Every allowed method, in declaration order.
	pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Patch, Self::Delete];

	/// Returns the canonical upper-case token.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for HttpMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let upper = s.to_ascii_uppercase();

		Self::ALL
			.into_iter()
			.find(|method| method.as_str() == upper)
			.ok_or_else(|| ConfigError::InvalidMethod { method: s.to_owned() })
	}
}

/// Configuration that passed every semantic check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
	/// Parsed target URL.
	pub url: Url,
	/// Normalized method.
	pub method: HttpMethod,
	/// Raw request body as declared.
	pub json: Option<String>,
}

/// Checks that `value` parses as an absolute URL.
pub fn validate_url(value: &str) -> Result<Url, ConfigError> {
	Url::parse(value).map_err(|source| ConfigError::InvalidUrl { url: value.to_owned(), source })
}

/// Checks that `value` names an allowed method, ignoring case.
pub fn validate_method(value: &str) -> Result<HttpMethod, ConfigError> {
	value.parse()
}
