//! Credentials files written by `gcloud auth application-default login` and friends.

// std
use std::{fs, path::Path};
// self
use crate::{
	_prelude::*,
	auth::{AuthToken, ScopeSet},
	error::TokenAcquisitionError,
	http::ReqwestHttpClient,
	oauth::{self, JwtBearerGrant, RefreshGrant},
};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// End-user credentials holding a long-lived refresh token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthorizedUser {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: String,
	/// Refresh token issued to the user.
	pub refresh_token: String,
	/// Token endpoint; Google's when absent.
	#[serde(default)]
	pub token_uri: Option<String>,
}
impl Debug for AuthorizedUser {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizedUser")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("token_uri", &self.token_uri)
			.finish()
	}
}

/// Service-account key exported from IAM.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccount {
	/// Service-account identity, used as the assertion issuer.
	pub client_email: String,
	/// PEM-encoded RSA private key.
	pub private_key: String,
	/// Identifier of the key, sent as the assertion's `kid`.
	#[serde(default)]
	pub private_key_id: Option<String>,
	/// Token endpoint; Google's when absent.
	#[serde(default)]
	pub token_uri: Option<String>,
}
impl Debug for ServiceAccount {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceAccount")
			.field("client_email", &self.client_email)
			.field("private_key", &"<redacted>")
			.field("private_key_id", &self.private_key_id)
			.field("token_uri", &self.token_uri)
			.finish()
	}
}

/// Parsed credentials file, keyed by its `type` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialsFile {
	/// `authorized_user` credentials.
	AuthorizedUser(AuthorizedUser),
	/// `service_account` key.
	ServiceAccount(ServiceAccount),
	/// Any credential type without a supported exchange.
	Other {
		/// Value of the `type` field.
		kind: String,
	},
}
impl CredentialsFile {
	/// Reads and parses the credentials file at `path`.
	pub fn load(path: &Path) -> Result<Self, TokenAcquisitionError> {
		let bytes = fs::read(path).map_err(|source| TokenAcquisitionError::CredentialsFile {
			path: path.to_path_buf(),
			source,
		})?;

		Self::from_slice(&bytes).map_err(|source| TokenAcquisitionError::MalformedCredentialsFile {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Parses credentials JSON.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		#[derive(Deserialize)]
		struct Header {
			#[serde(rename = "type")]
			kind: String,
		}

		let header: Header =
			serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(bytes))?;

		match header.kind.as_str() {
			"authorized_user" => serde_path_to_error::deserialize(
				&mut serde_json::Deserializer::from_slice(bytes),
			)
			.map(Self::AuthorizedUser),
			"service_account" => serde_path_to_error::deserialize(
				&mut serde_json::Deserializer::from_slice(bytes),
			)
			.map(Self::ServiceAccount),
			_ => Ok(Self::Other { kind: header.kind }),
		}
	}

	/// Value of the file's `type` field.
	pub fn kind(&self) -> &str {
		match self {
			Self::AuthorizedUser(_) => "authorized_user",
			Self::ServiceAccount(_) => "service_account",
			Self::Other { kind } => kind,
		}
	}

	/// Exchanges the credential for an access token covering `scope`.
	pub async fn exchange(
		&self,
		http_client: &ReqwestHttpClient,
		scope: &ScopeSet,
	) -> Result<AuthToken, TokenAcquisitionError> {
		match self {
			Self::AuthorizedUser(user) => {
				let grant = RefreshGrant {
					token_url: user.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI),
					client_id: &user.client_id,
					client_secret: &user.client_secret,
					refresh_token: &user.refresh_token,
				};

				oauth::exchange_refresh_token(http_client, grant, scope).await
			},
			Self::ServiceAccount(account) => {
				let grant = JwtBearerGrant {
					token_url: account.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI),
					client_email: &account.client_email,
					private_key_pem: &account.private_key,
					private_key_id: account.private_key_id.as_deref(),
				};

				oauth::exchange_jwt_bearer(http_client, grant, scope).await
			},
			Self::Other { kind } =>
				Err(TokenAcquisitionError::UnsupportedCredentialType { kind: kind.clone() }),
		}
	}
}
