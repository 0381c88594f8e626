//! Demonstrates a single provisioning call authenticated with a static bearer token, printing the
//! progress line and the response body through a closure sink.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use rest_provisioner::{
	auth::GoogleDefaultCredentials,
	config::ProvisionerConfig,
	http::ReqwestHttpClient,
	provisioner::{Invocation, Provisioner},
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let target_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/projects/demo/buckets")
				.header("authorization", "Bearer demo-token")
				.header("content-type", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"name\":\"demo-bucket\",\"location\":\"EU\"}");
		})
		.await;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let provisioner = Provisioner::with_parts(
		Arc::new(http_client),
		Arc::new(GoogleDefaultCredentials::from_env()),
	);
	let config = ProvisionerConfig::new(server.url("/v1/projects/demo/buckets"), "post")
		.with_json("{\"name\":\"demo-bucket\",\"location\":\"EU\"}")
		.with_access_token("demo-token");
	let sink = |line: &str| println!("{line}");

	provisioner.apply(Invocation::new(&config, &sink)).await?;

	target_mock.assert_async().await;

	Ok(())
}
