//! Outbound request assembly.

// self
use crate::{
	_prelude::*,
	config::{HttpMethod, ValidatedConfig},
};

/// Request derived from a validated configuration; built once and consumed by one execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingRequest {
	/// Normalized method.
	pub method: HttpMethod,
	/// Target URL.
	pub url: Url,
	/// JSON body; never `Some("")`.
	pub body: Option<String>,
}
impl OutgoingRequest {
	/// Builds the request, folding an empty body into no body.
	pub fn new(config: ValidatedConfig) -> Self {
		let ValidatedConfig { url, method, json } = config;

		Self { method, url, body: json.filter(|json| !json.is_empty()) }
	}

	/// Body bytes as they will appear on the wire.
	pub fn body_bytes(&self) -> Option<&[u8]> {
		self.body.as_deref().map(str::as_bytes)
	}

	/// Progress line announced to the operator before the call is made.
	pub fn summary(&self) -> String {
		format!("Executing {} on {}", self.method, self.url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn validated(method: HttpMethod, json: Option<&str>) -> ValidatedConfig {
		ValidatedConfig {
			url: Url::parse("https://example.com/api").expect("Failed to parse test URL."),
			method,
			json: json.map(str::to_owned),
		}
	}

	#[test]
	fn empty_json_folds_to_no_body() {
		assert!(OutgoingRequest::new(validated(HttpMethod::Post, Some(""))).body.is_none());
		assert!(OutgoingRequest::new(validated(HttpMethod::Post, None)).body.is_none());
	}

	#[test]
	fn json_body_reads_back_verbatim() {
		let request = OutgoingRequest::new(validated(HttpMethod::Post, Some("{\"a\":1}")));

		assert_eq!(request.body_bytes(), Some(b"{\"a\":1}".as_slice()));
	}

	#[test]
	fn summary_uses_normalized_method_and_url() {
		let config = crate::config::ProvisionerConfig::new("https://example.com/api", "post")
			.validate()
			.expect("Configuration should validate.");

		assert_eq!(
			OutgoingRequest::new(config).summary(),
			"Executing POST on https://example.com/api",
		);
		assert_eq!(
			OutgoingRequest::new(validated(HttpMethod::Delete, None)).summary(),
			"Executing DELETE on https://example.com/api",
		);
	}
}
