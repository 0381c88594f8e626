//! Provisioner configuration as handed over by the host framework.
//!
//! Structural checks (field presence and JSON types) run once while the host deserializes a
//! [`ProvisionerConfig`]; semantic checks (URL syntax, method allow-list) live in [`validate`]
//! and run both at declaration time and again right before execution.

pub mod validate;

pub use validate::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Declared intent of a single REST call.
///
/// The core never mutates a configuration; every stage borrows it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerConfig {
	/// REST URL to call.
	pub url: String,
	/// REST method (GET, POST, PATCH, DELETE), matched case-insensitively.
	pub method: String,
	/// JSON content of the request; empty or absent means no body.
	#[serde(default)]
	pub json: Option<String>,
	/// Static bearer token; empty or absent triggers ambient acquisition. Never serialized.
	#[serde(default, skip_serializing)]
	pub access_token: Option<String>,
}
impl ProvisionerConfig {
	/// Creates a configuration without body or static token.
	pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
		Self { url: url.into(), method: method.into(), json: None, access_token: None }
	}

	/// Attaches a JSON request body.
	pub fn with_json(mut self, json: impl Into<String>) -> Self {
		self.json = Some(json.into());

		self
	}

	/// Attaches a static bearer token.
	pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(token.into());

		self
	}

	/// Builds a configuration from the host's raw JSON object.
	///
	/// Type mismatches surface as [`ConfigError::InvalidJsonType`] carrying the field path.
	pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		serde_path_to_error::deserialize(value).map_err(ConfigError::from)
	}

	/// Builds a configuration from a JSON document.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);
		let config = serde_path_to_error::deserialize(&mut de)?;

		de.end().map_err(|source| ConfigError::InvalidJsonType { path: ".".into(), source })?;

		Ok(config)
	}

	/// Runs the execution-time semantic checks, stopping at the first failure.
	pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
		let url = validate_url(&self.url)?;
		let method = validate_method(&self.method)?;

		Ok(ValidatedConfig { url, method, json: self.json.clone() })
	}

	/// Runs the declaration-time checks and reports every problem found.
	pub fn diagnostics(&self) -> Vec<ConfigError> {
		let mut errors = Vec::new();

		if let Err(e) = validate_url(&self.url) {
			errors.push(e);
		}
		if let Err(e) = validate_method(&self.method) {
			errors.push(e);
		}

		errors
	}
}
impl Debug for ProvisionerConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProvisionerConfig")
			.field("url", &self.url)
			.field("method", &self.method)
			.field("json", &self.json)
			.field("access_token_set", &self.access_token.as_deref().is_some_and(|t| !t.is_empty()))
			.finish()
	}
}
