//! OAuth 2.0 token exchanges for ambient credentials.
//!
//! End-user credentials go through the `oauth2` crate's refresh-token grant. Service-account keys
//! sign an RS256 assertion with `jsonwebtoken` and post it as a JWT-bearer grant (RFC 7523).

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{AuthToken, ScopeSet, token},
	error::{TokenAcquisitionError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
	response,
};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Client registration and long-lived refresh token of an end-user credential.
#[derive(Clone)]
pub(crate) struct RefreshGrant<'a> {
	pub token_url: &'a str,
	pub client_id: &'a str,
	pub client_secret: &'a str,
	pub refresh_token: &'a str,
}

/// Exchanges a refresh token for an access token covering `scope`.
///
/// Client credentials travel in the request body.
pub(crate) async fn exchange_refresh_token(
	http_client: &ReqwestHttpClient,
	grant: RefreshGrant<'_>,
	scope: &ScopeSet,
) -> Result<AuthToken, TokenAcquisitionError> {
	let token_url = TokenUrl::new(grant.token_url.to_owned())
		.map_err(|source| TokenAcquisitionError::InvalidEndpoint { source })?;
	let oauth_client: ConfiguredBasicClient =
		BasicClient::new(ClientId::new(grant.client_id.to_owned()))
			.set_client_secret(ClientSecret::new(grant.client_secret.to_owned()))
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);
	let meta = ResponseMetadataSlot::default();
	let instrumented = http_client.instrumented(meta.clone());
	let refresh_secret = RefreshToken::new(grant.refresh_token.to_owned());
	let mut request = oauth_client.exchange_refresh_token(&refresh_secret);

	for value in scope.iter() {
		request = request.add_scope(Scope::new(value.to_owned()));
	}

	let response = request
		.request_async(&instrumented)
		.await
		.map_err(|err| map_request_error(meta.take(), err))?;

	Ok(ambient_token(&response))
}

/// Service-account identity and the PEM key that signs its assertions.
#[derive(Clone)]
pub(crate) struct JwtBearerGrant<'a> {
	pub token_url: &'a str,
	pub client_email: &'a str,
	pub private_key_pem: &'a str,
	pub private_key_id: Option<&'a str>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
struct AssertionClaims {
	iss: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	scope: Option<String>,
	aud: String,
	iat: i64,
	exp: i64,
}

/// Exchanges a signed service-account assertion for an access token covering `scope`.
pub(crate) async fn exchange_jwt_bearer(
	http_client: &ReqwestHttpClient,
	grant: JwtBearerGrant<'_>,
	scope: &ScopeSet,
) -> Result<AuthToken, TokenAcquisitionError> {
	let token_url = Url::parse(grant.token_url)
		.map_err(|source| TokenAcquisitionError::InvalidEndpoint { source })?;
	let assertion = sign_assertion(&grant, scope, OffsetDateTime::now_utc())?;
	let response = http_client
		.post(token_url)
		.form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
		.send()
		.await
		.map_err(TransportError::from)?;
	let status = response.status().as_u16();
	let body = response.bytes().await.map_err(TransportError::body_read)?;

	if !response::is_success(status) {
		return Err(match serde_json::from_slice::<BasicErrorResponse>(&body) {
			Ok(error) => map_server_response_error(Some(status), error),
			Err(_) => TokenAcquisitionError::Rejected {
				status: Some(status),
				reason: String::from_utf8_lossy(&body).trim().to_owned(),
			},
		});
	}

	let mut de = serde_json::Deserializer::from_slice(&body);
	let payload: BasicTokenResponse = serde_path_to_error::deserialize(&mut de).map_err(|source| {
		TokenAcquisitionError::MalformedResponse { source, status: Some(status) }
	})?;

	Ok(ambient_token(&payload))
}

fn sign_assertion(
	grant: &JwtBearerGrant<'_>,
	scope: &ScopeSet,
	issued_at: OffsetDateTime,
) -> Result<String, TokenAcquisitionError> {
	let iat = issued_at.unix_timestamp();
	let claims = AssertionClaims {
		iss: grant.client_email.to_owned(),
		scope: scope.join(" "),
		aud: grant.token_url.to_owned(),
		iat,
		exp: iat + ASSERTION_LIFETIME_SECS,
	};
	let mut header = Header::new(Algorithm::RS256);

	header.kid = grant.private_key_id.map(str::to_owned);

	let key = EncodingKey::from_rsa_pem(grant.private_key_pem.as_bytes())
		.map_err(|source| TokenAcquisitionError::AssertionSigning { source })?;

	jsonwebtoken::encode(&header, &claims, &key)
		.map_err(|source| TokenAcquisitionError::AssertionSigning { source })
}

fn ambient_token<R>(response: &R) -> AuthToken
where
	R: TokenResponse,
{
	let expires_in =
		response.expires_in().and_then(|lifetime| i64::try_from(lifetime.as_secs()).ok());

	AuthToken::ambient(
		response.access_token().secret().to_owned(),
		token::expires_at_from_now(expires_in),
	)
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> TokenAcquisitionError {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(status, response),
		RequestTokenError::Request(error) => map_transport_error(error),
		RequestTokenError::Parse(source, _body) =>
			TokenAcquisitionError::MalformedResponse { source, status },
		RequestTokenError::Other(message) =>
			TokenAcquisitionError::Rejected { status, reason: message },
	}
}

fn map_server_response_error(
	status: Option<u16>,
	response: BasicErrorResponse,
) -> TokenAcquisitionError {
	let reason = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	TokenAcquisitionError::Rejected { status, reason }
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> TokenAcquisitionError {
	match err {
		HttpClientError::Reqwest(inner) => TransportError::from(*inner).into(),
		HttpClientError::Http(inner) => TransportError::request_build(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TokenAcquisitionError::Rejected {
			status: None,
			reason: format!("HTTP client error occurred while refreshing the token: {message}"),
		},
		_ => TokenAcquisitionError::Rejected {
			status: None,
			reason: "HTTP client error occurred while refreshing the token".into(),
		},
	}
}
