//! Invocation orchestration: validate, resolve a token, build, execute, classify.
//!
//! Each call to [`Provisioner::apply`] runs the five stages strictly in order and stops at the
//! first error. Nothing survives an invocation: the token, request, and response are created
//! and dropped inside the call, so one [`Provisioner`] can serve concurrent invocations.
//! Cancellation is inherited from the caller; dropping the returned future aborts whatever
//! network operation is in flight.

// self
use crate::{
	_prelude::*,
	auth::{AmbientCredentials, GoogleDefaultCredentials, TokenResolver},
	config::ProvisionerConfig,
	http::{HttpExecutor, ReqwestHttpClient},
	obs::{self, Stage},
	request::OutgoingRequest,
	sink::ProgressSink,
};

/// Provisioner specialized for the crate's default reqwest transport and Google credentials.
pub type DefaultProvisioner = Provisioner<ReqwestHttpClient, GoogleDefaultCredentials>;

/// Everything a single invocation needs, handed over explicitly by the host.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
	/// Declared intent.
	pub config: &'a ProvisionerConfig,
	/// Destination for progress lines and the response body.
	pub sink: &'a dyn ProgressSink,
}
impl<'a> Invocation<'a> {
	/// Bundles a configuration with its output sink.
	pub fn new(config: &'a ProvisionerConfig, sink: &'a dyn ProgressSink) -> Self {
		Self { config, sink }
	}
}
impl Debug for Invocation<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Invocation").field("config", self.config).finish_non_exhaustive()
	}
}

/// Issues one authenticated REST call per invocation.
pub struct Provisioner<C, A>
where
	C: ?Sized + HttpExecutor,
	A: ?Sized + AmbientCredentials,
{
	/// Transport used for the target call.
	pub http_client: Arc<C>,
	/// Token resolver wrapping the ambient credential provider.
	pub resolver: TokenResolver<A>,
}
impl<C, A> Provisioner<C, A>
where
	C: ?Sized + HttpExecutor,
	A: ?Sized + AmbientCredentials,
{
	/// Creates a provisioner from a transport and an ambient credential provider.
	pub fn with_parts(http_client: Arc<C>, ambient: Arc<A>) -> Self {
		Self { http_client, resolver: TokenResolver::new(ambient) }
	}

	/// Runs one invocation.
	///
	/// Emits `Executing <METHOD> on <URL>` before the network call and the response body after
	/// a 2xx answer. Any failure is returned unchanged and nothing further is emitted.
	pub async fn apply(&self, invocation: Invocation<'_>) -> Result<()> {
		let Invocation { config, sink } = invocation;
		let validated = obs::observe(Stage::Validate, || config.validate())?;
		let token = obs::observe_async(
			Stage::ResolveToken,
			self.resolver.resolve(config.access_token.as_deref()),
		)
		.await?;
		let request = OutgoingRequest::new(validated);

		sink.output(&request.summary());

		let result = obs::observe_async(
			Stage::Execute,
			<C as HttpExecutor>::execute(self.http_client.as_ref(), request, &token),
		)
		.await?;
		let body = obs::observe(Stage::Classify, || result.classify())?;

		sink.output(&body);

		Ok(())
	}
}
impl DefaultProvisioner {
	/// Creates a provisioner with a default reqwest client and credentials discovered from the
	/// process environment.
	pub fn new() -> Self {
		Self::with_parts(
			Arc::new(ReqwestHttpClient::default()),
			Arc::new(GoogleDefaultCredentials::from_env()),
		)
	}
}
impl Default for DefaultProvisioner {
	fn default() -> Self {
		Self::new()
	}
}
impl<C, A> Clone for Provisioner<C, A>
where
	C: ?Sized + HttpExecutor,
	A: ?Sized + AmbientCredentials,
{
	fn clone(&self) -> Self {
		Self { http_client: self.http_client.clone(), resolver: self.resolver.clone() }
	}
}
impl<C, A> Debug for Provisioner<C, A>
where
	C: ?Sized + HttpExecutor,
	A: ?Sized + AmbientCredentials,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Provisioner").field("resolver", &self.resolver).finish_non_exhaustive()
	}
}
