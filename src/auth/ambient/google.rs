//! Google Application Default Credentials.
//!
//! Discovery follows the usual order and stops at the first source that exists:
//!
//! 1. the file named by `GOOGLE_APPLICATION_CREDENTIALS`;
//! 2. gcloud's well-known `application_default_credentials.json`;
//! 3. the compute metadata server of the VM or container the process runs on.

mod file;
mod metadata;

pub use file::*;

// std
use std::{
	env,
	path::{Path, PathBuf},
	time::Duration as StdDuration,
};
// self
use crate::{
	_prelude::*,
	auth::{AmbientCredentials, AmbientFuture, ScopeSet},
	http::ReqwestHttpClient,
};

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Environment variable overriding the metadata server host.
pub const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";
/// Link-local address of the compute metadata server.
pub const DEFAULT_METADATA_HOST: &str = "169.254.169.254";

const WELL_KNOWN_FILE: &str = "application_default_credentials.json";
const DEFAULT_METADATA_TIMEOUT: StdDuration = StdDuration::from_secs(5);

/// [`AmbientCredentials`] provider implementing Google's default credential discovery.
#[derive(Clone)]
pub struct GoogleDefaultCredentials {
	http_client: ReqwestHttpClient,
	credentials_file: Option<PathBuf>,
	well_known_file: Option<PathBuf>,
	metadata_host: String,
	metadata_timeout: StdDuration,
}
impl GoogleDefaultCredentials {
	/// Builds a provider from the process environment.
	pub fn from_env() -> Self {
		Self {
			http_client: ReqwestHttpClient::default(),
			credentials_file: env::var_os(CREDENTIALS_ENV)
				.filter(|value| !value.is_empty())
				.map(PathBuf::from),
			well_known_file: well_known_file_path(),
			metadata_host: env::var(METADATA_HOST_ENV)
				.ok()
				.filter(|value| !value.is_empty())
				.unwrap_or_else(|| DEFAULT_METADATA_HOST.into()),
			metadata_timeout: DEFAULT_METADATA_TIMEOUT,
		}
	}

	/// Builds a provider that only consults the metadata server at `host`.
	pub fn metadata_only(host: impl Into<String>) -> Self {
		Self {
			http_client: ReqwestHttpClient::default(),
			credentials_file: None,
			well_known_file: None,
			metadata_host: host.into(),
			metadata_timeout: DEFAULT_METADATA_TIMEOUT,
		}
	}

	/// Replaces the HTTP client used for identity-provider calls.
	pub fn with_http_client(mut self, http_client: ReqwestHttpClient) -> Self {
		self.http_client = http_client;

		self
	}

	/// Sets the explicit credentials file (the `GOOGLE_APPLICATION_CREDENTIALS` slot).
	pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
		self.credentials_file = Some(path.into());

		self
	}

	/// Overrides (or disables, with `None`) the well-known credentials file.
	pub fn with_well_known_file(mut self, path: Option<PathBuf>) -> Self {
		self.well_known_file = path;

		self
	}

	/// Overrides the metadata server host (`host[:port]`).
	pub fn with_metadata_host(mut self, host: impl Into<String>) -> Self {
		self.metadata_host = host.into();

		self
	}

	/// Bounds how long the metadata server may take to answer (defaults to 5 seconds).
	pub fn with_metadata_timeout(mut self, timeout: StdDuration) -> Self {
		self.metadata_timeout = timeout;

		self
	}

	/// Explicit credentials file, if configured.
	pub fn credentials_file(&self) -> Option<&Path> {
		self.credentials_file.as_deref()
	}

	/// Metadata server host.
	pub fn metadata_host(&self) -> &str {
		&self.metadata_host
	}
}
impl Debug for GoogleDefaultCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GoogleDefaultCredentials")
			.field("credentials_file", &self.credentials_file)
			.field("well_known_file", &self.well_known_file)
			.field("metadata_host", &self.metadata_host)
			.field("metadata_timeout", &self.metadata_timeout)
			.finish()
	}
}
impl AmbientCredentials for GoogleDefaultCredentials {
	fn acquire<'a>(&'a self, scope: &'a ScopeSet) -> AmbientFuture<'a> {
		Box::pin(async move {
			// A named file must load; a missing well-known file falls through.
			if let Some(path) = &self.credentials_file {
				return CredentialsFile::load(path)?.exchange(&self.http_client, scope).await;
			}
			if let Some(path) = self.well_known_file.as_deref().filter(|path| path.is_file()) {
				return CredentialsFile::load(path)?.exchange(&self.http_client, scope).await;
			}

			metadata::fetch_token(
				&self.http_client,
				&self.metadata_host,
				self.metadata_timeout,
				scope,
			)
			.await
		})
	}
}

fn well_known_file_path() -> Option<PathBuf> {
	if let Some(dir) = env::var_os("CLOUDSDK_CONFIG").filter(|value| !value.is_empty()) {
		return Some(PathBuf::from(dir).join(WELL_KNOWN_FILE));
	}

	let config_dir = if cfg!(windows) {
		PathBuf::from(env::var_os("APPDATA")?)
	} else {
		PathBuf::from(env::var_os("HOME")?).join(".config")
	};

	Some(config_dir.join("gcloud").join(WELL_KNOWN_FILE))
}
