//! Transport primitives for the outbound REST call and identity-provider exchanges.
//!
//! [`HttpExecutor`] is the provisioner's only dependency on an HTTP stack for the target call.
//! [`ReqwestHttpClient`] implements it and additionally hands out [`InstrumentedHandle`]s, the
//! [`AsyncHttpClient`] adapter the `oauth2` crate drives during refresh-token exchanges. Each
//! handle records the response status in a [`ResponseMetadataSlot`] so provider rejections can
//! be reported with the status that produced them.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use reqwest::{
	Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::AuthToken,
	config::HttpMethod,
	error::TransportError,
	request::OutgoingRequest,
	response::{self, ExecutionResult},
};

/// Future returned by [`HttpExecutor::execute`].
pub type ExecuteFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ExecutionResult, TransportError>> + 'a + Send>>;

/// Performs the single authenticated network call of an invocation.
///
/// Implementations send `request` with `token` as bearer authorization, impose no timeout of
/// their own, and read the full response body into memory on a 2xx status only. Dropping the
/// returned future must abort the in-flight request.
pub trait HttpExecutor
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the raw status and body.
	fn execute<'a>(&'a self, request: OutgoingRequest, token: &'a AuthToken) -> ExecuteFuture<'a>;
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds an instrumented `oauth2` transport that captures response metadata.
	pub(crate) fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle::new(self.0.clone(), slot)
	}

	/// Converts an [`OutgoingRequest`] into a reqwest [`Request`] carrying `token`.
	pub(crate) fn build_request(
		&self,
		request: OutgoingRequest,
		token: &AuthToken,
	) -> Result<Request, TransportError> {
		let mut authorization = HeaderValue::from_str(&token.authorization_header())
			.map_err(TransportError::request_build)?;

		authorization.set_sensitive(true);

		let OutgoingRequest { method, url, body } = request;
		let mut builder =
			self.0.request(reqwest_method(method), url).header(AUTHORIZATION, authorization);

		if let Some(body) = body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(body);
		}

		Ok(builder.build()?)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl HttpExecutor for ReqwestHttpClient {
	fn execute<'a>(&'a self, request: OutgoingRequest, token: &'a AuthToken) -> ExecuteFuture<'a> {
		Box::pin(async move {
			let request = self.build_request(request, token)?;
			let response = self.0.execute(request).await?;
			let status = response.status().as_u16();

			// Bodies outside the success band are never surfaced, so they are not read.
			if !response::is_success(status) {
				return Ok(ExecutionResult::new(status, Vec::new()));
			}

			let body = response.bytes().await.map_err(TransportError::body_read)?;

			Ok(ExecutionResult::new(status, body.to_vec()))
		})
	}
}

/// Instrumented adapter that implements [`AsyncHttpClient`] for reqwest.
pub(crate) struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
impl InstrumentedHttpClient {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self { client, slot }
	}
}

/// Handle returned by [`ReqwestHttpClient`] for `oauth2` token exchanges.
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient::new(client, slot)))
	}
}
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

fn reqwest_method(method: HttpMethod) -> Method {
	match method {
		HttpMethod::Get => Method::GET,
		HttpMethod::Post => Method::POST,
		HttpMethod::Patch => Method::PATCH,
		HttpMethod::Delete => Method::DELETE,
	}
}
