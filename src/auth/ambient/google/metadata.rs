//! Token acquisition from the compute metadata server.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{AuthToken, ScopeSet, token},
	error::{TokenAcquisitionError, TransportError},
	http::ReqwestHttpClient,
	response,
};

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Deserialize)]
struct MetadataToken {
	access_token: String,
	#[serde(default)]
	expires_in: Option<i64>,
}

/// Builds the token URL for `host`, listing `scope` comma-separated.
pub(super) fn token_url(host: &str, scope: &ScopeSet) -> Result<Url, TokenAcquisitionError> {
	let mut url = Url::parse(&format!("http://{host}{TOKEN_PATH}"))
		.map_err(|source| TokenAcquisitionError::InvalidEndpoint { source })?;

	if let Some(scopes) = scope.join(",") {
		url.query_pairs_mut().append_pair("scopes", &scopes);
	}

	Ok(url)
}

/// Requests a token for the VM's default service account.
///
/// Failing to reach the server at all means no ambient identity exists.
pub(super) async fn fetch_token(
	http_client: &ReqwestHttpClient,
	host: &str,
	timeout: StdDuration,
	scope: &ScopeSet,
) -> Result<AuthToken, TokenAcquisitionError> {
	let url = token_url(host, scope)?;
	let response = http_client
		.get(url)
		.header("Metadata-Flavor", "Google")
		.timeout(timeout)
		.send()
		.await
		.map_err(|e| TokenAcquisitionError::NoAmbientIdentity { source: Box::new(e) })?;
	let status = response.status().as_u16();
	let body = response.bytes().await.map_err(TransportError::body_read)?;

	if !response::is_success(status) {
		return Err(TokenAcquisitionError::Rejected {
			status: Some(status),
			reason: String::from_utf8_lossy(&body).trim().to_owned(),
		});
	}

	let mut de = serde_json::Deserializer::from_slice(&body);
	let payload: MetadataToken = serde_path_to_error::deserialize(&mut de).map_err(|source| {
		TokenAcquisitionError::MalformedResponse { source, status: Some(status) }
	})?;

	Ok(AuthToken::ambient(payload.access_token, token::expires_at_from_now(payload.expires_in)))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_url_lists_scopes_in_query() {
		let scope = ScopeSet::new(["https://www.googleapis.com/auth/cloud-platform"])
			.expect("Failed to build test scope.");
		let url = token_url("169.254.169.254", &scope).expect("Token URL should build.");

		assert_eq!(url.path(), TOKEN_PATH);
		assert_eq!(
			url.query_pairs().collect::<Vec<_>>(),
			vec![("scopes".into(), "https://www.googleapis.com/auth/cloud-platform".into())],
		);
	}

	#[test]
	fn unparseable_host_is_rejected() {
		let err = token_url("bad host", &ScopeSet::default()).expect_err("Host must be rejected.");

		assert!(matches!(err, TokenAcquisitionError::InvalidEndpoint { .. }));
	}
}
