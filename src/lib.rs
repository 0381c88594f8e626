//! Single-shot authenticated REST calls for provisioning steps: validate the declared intent,
//! resolve a static or ambient bearer token, send one request, and classify the answer.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provisioner;
pub mod request;
pub mod response;
pub mod sink;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AmbientCredentials, AmbientFuture, AuthToken, ScopeSet},
		error::TokenAcquisitionError,
		http::ReqwestHttpClient,
		provisioner::Provisioner,
	};

	/// Provisioner type alias used by reqwest-backed integration tests.
	pub type ReqwestTestProvisioner = Provisioner<ReqwestHttpClient, RecordingAmbient>;

	/// Ambient credential double that records every requested scope set.
	#[derive(Debug, Default)]
	pub struct RecordingAmbient {
		token: Option<String>,
		requests: Mutex<Vec<ScopeSet>>,
	}
	impl RecordingAmbient {
		/// Issues `token` on every acquisition.
		pub fn issuing(token: impl Into<String>) -> Self {
			Self { token: Some(token.into()), requests: Default::default() }
		}

		/// Fails every acquisition as if no ambient identity existed.
		pub fn unavailable() -> Self {
			Self::default()
		}

		/// Scope sets requested so far, in call order.
		pub fn requested_scopes(&self) -> Vec<ScopeSet> {
			self.requests.lock().clone()
		}
	}
	impl AmbientCredentials for RecordingAmbient {
		fn acquire<'a>(&'a self, scope: &'a ScopeSet) -> AmbientFuture<'a> {
			self.requests.lock().push(scope.clone());

			let outcome = match &self.token {
				Some(token) => Ok(AuthToken::ambient(token.clone(), None)),
				None => Err(TokenAcquisitionError::NoAmbientIdentity {
					source: "no ambient identity configured for this test".into(),
				}),
			};

			Box::pin(async move { outcome })
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Provisioner`] backed by the test reqwest transport and `ambient`.
	pub fn build_test_provisioner(
		ambient: RecordingAmbient,
	) -> (ReqwestTestProvisioner, Arc<RecordingAmbient>) {
		let ambient = Arc::new(ambient);
		let provisioner =
			Provisioner::with_parts(Arc::new(test_reqwest_http_client()), ambient.clone());

		(provisioner, ambient)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
