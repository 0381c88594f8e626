//! Provisioner-level error types shared across validation, token resolution, and execution.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, auth::ScopeValidationError};

/// Provisioner-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provisioner error exposed by public APIs.
///
/// Every variant is fatal to the invocation that produced it.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Configuration failed validation.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No bearer token could be obtained.
	#[error(transparent)]
	TokenAcquisition(#[from] TokenAcquisitionError),
	/// Transport failure (DNS, TCP, TLS, cancellation, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Target answered outside the 2xx band.
	#[error("HTTP request returned status {code}.")]
	HttpStatus {
		/// Numeric HTTP status code.
		code: u16,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// `url` does not parse as an absolute URL.
	#[error("Field `url` is not a valid URL: {url:?}.")]
	InvalidUrl {
		/// Raw value supplied by the host.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// `method` is outside the allow-list.
	#[error("Field `method` holds an unsupported HTTP method: {method:?}.")]
	InvalidMethod {
		/// Raw value supplied by the host.
		method: String,
	},
	/// A configuration field is missing or carries the wrong type.
	#[error("Configuration field `{path}` is missing or has an invalid type.")]
	InvalidJsonType {
		/// Path of the offending field, `.` for the document root.
		path: String,
		/// Underlying deserialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Name of the configuration field the error refers to.
	pub fn field(&self) -> &str {
		match self {
			Self::InvalidUrl { .. } => "url",
			Self::InvalidMethod { .. } => "method",
			Self::InvalidJsonType { path, .. } => path,
		}
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::InvalidJsonType { path, source: e.into_inner() }
	}
}

/// Failures raised while obtaining a bearer token.
#[derive(Debug, ThisError)]
pub enum TokenAcquisitionError {
	/// No credentials file exists and the metadata server is unreachable.
	#[error("No ambient cloud identity is available.")]
	NoAmbientIdentity {
		/// Failure observed while probing the metadata server.
		#[source]
		source: BoxError,
	},
	/// Credentials file could not be read.
	#[error("Failed to read credentials file {}.", path.display())]
	CredentialsFile {
		/// Location of the credentials file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Credentials file is not valid credentials JSON.
	#[error("Credentials file {} is malformed.", path.display())]
	MalformedCredentialsFile {
		/// Location of the credentials file.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Credentials file holds a credential type this crate cannot exchange.
	#[error("Credential type `{kind}` is not supported.")]
	UnsupportedCredentialType {
		/// Value of the file's `type` field.
		kind: String,
	},
	/// Service-account assertion could not be signed, usually because the private key is invalid.
	#[error("Failed to sign the service account assertion.")]
	AssertionSigning {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Requested scopes are invalid.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] ScopeValidationError),
	/// Identity endpoint URL is invalid.
	#[error("Identity endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Identity provider refused to issue a token.
	#[error("Identity provider rejected the token request: {reason}.")]
	Rejected {
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Identity provider answered with an unparseable token payload.
	#[error("Identity provider returned a malformed token response.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Network failure while talking to the identity provider.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Response body could not be read to completion.
	#[error("Response body could not be read.")]
	BodyRead {
		/// Transport-specific read error.
		#[source]
		source: BoxError,
	},
	/// Outbound request could not be assembled.
	#[error("HTTP request could not be constructed.")]
	RequestBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a failure raised while draining the response body.
	pub fn body_read(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::BodyRead { source: Box::new(src) }
	}

	/// Wraps a request builder failure.
	pub fn request_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::RequestBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_builder() { Self::request_build(e) } else { Self::network(e) }
	}
}
