// std
use std::{
	io::{Read, Write},
	net::TcpListener,
	thread,
	time::Duration as StdDuration,
};
// crates.io
use httpmock::prelude::*;
// self
use rest_provisioner::{
	_preludet::*,
	config::ProvisionerConfig,
	error::TransportError,
	provisioner::Invocation,
	sink::MemorySink,
};

/// Answers the first connection with `response` verbatim, then keeps the socket open for `linger`.
fn serve_raw_once(response: &'static str, linger: StdDuration) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind raw test listener.");
	let addr = listener.local_addr().expect("Raw test listener should have an address.");

	thread::spawn(move || {
		let (mut stream, _) = listener.accept().expect("Raw test listener failed to accept.");
		let mut request = Vec::new();
		let mut buf = [0; 1024];

		while !request.windows(4).any(|window| window == b"\r\n\r\n") {
			let read = stream.read(&mut buf).expect("Failed to read test request.");

			if read == 0 {
				break;
			}

			request.extend_from_slice(&buf[..read]);
		}

		stream.write_all(response.as_bytes()).expect("Failed to write raw test response.");
		thread::sleep(linger);
	});

	format!("http://{addr}/x")
}

#[tokio::test]
async fn static_token_post_reports_progress_then_body() {
	let server = MockServer::start_async().await;
	let (provisioner, ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api")
				.header("authorization", "Bearer tok")
				.header("content-type", "application/json")
				.body("{\"k\":\"v\"}");
			then.status(201).body("created");
		})
		.await;
	let config = ProvisionerConfig::new(server.url("/api"), "POST")
		.with_json("{\"k\":\"v\"}")
		.with_access_token("tok");
	let sink = MemorySink::default();

	provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect("201 response should be a success.");

	mock.assert_async().await;

	assert_eq!(
		sink.lines(),
		vec![format!("Executing POST on {}", server.url("/api")), "created".into()],
	);
	assert!(ambient.requested_scopes().is_empty(), "Static tokens must skip ambient acquisition.");
}

#[tokio::test]
async fn ambient_token_is_used_when_no_static_token_is_configured() {
	let server = MockServer::start_async().await;
	let (provisioner, ambient) = build_test_provisioner(RecordingAmbient::issuing("ambient-token"));
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/items").header("authorization", "Bearer ambient-token");
			then.status(200).body("[]");
		})
		.await;
	let config = ProvisionerConfig::new(server.url("/items"), "get").with_access_token("");
	let sink = MemorySink::default();

	provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect("Ambient-token GET should succeed.");

	mock.assert_async().await;

	let requested = ambient.requested_scopes();

	assert_eq!(requested.len(), 1);
	assert_eq!(requested[0].as_slice(), ["https://www.googleapis.com/auth/cloud-platform"]);
	assert_eq!(
		sink.lines(),
		vec![format!("Executing GET on {}", server.url("/items")), "[]".into()],
	);
}

#[tokio::test]
async fn non_success_status_fails_without_emitting_body() {
	let server = MockServer::start_async().await;
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/items/7");
			then.status(404).body("missing");
		})
		.await;
	let config =
		ProvisionerConfig::new(server.url("/items/7"), "Delete").with_access_token("tok");
	let sink = MemorySink::default();
	let err = provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect_err("404 must fail the invocation.");

	mock.assert_async().await;

	assert!(matches!(err, Error::HttpStatus { code: 404 }));
	assert_eq!(sink.lines(), vec![format!("Executing DELETE on {}", server.url("/items/7"))]);
}

#[tokio::test]
async fn non_success_statuses_are_never_retried() {
	let server = MockServer::start_async().await;
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/busy");
			then.status(503).header("retry-after", "1").body("busy");
		})
		.await;
	let config = ProvisionerConfig::new(server.url("/busy"), "PATCH")
		.with_json("{\"replicas\":3}")
		.with_access_token("tok");
	let sink = MemorySink::default();
	let err = provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect_err("503 must fail the invocation.");

	assert!(matches!(err, Error::HttpStatus { code: 503 }));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_target_surfaces_transport_error() {
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let config =
		ProvisionerConfig::new("http://127.0.0.1:1/unreachable", "GET").with_access_token("tok");
	let sink = MemorySink::default();
	let err = provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect_err("Connection refusal must fail the invocation.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(sink.lines(), vec!["Executing GET on http://127.0.0.1:1/unreachable"]);
}

#[tokio::test]
async fn dropping_the_invocation_aborts_the_request() {
	let server = MockServer::start_async().await;
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(StdDuration::from_secs(10)).body("late");
		})
		.await;
	let config = ProvisionerConfig::new(server.url("/slow"), "GET").with_access_token("tok");
	let sink = MemorySink::default();
	let outcome = tokio::time::timeout(
		StdDuration::from_millis(200),
		provisioner.apply(Invocation::new(&config, &sink)),
	)
	.await;

	assert!(outcome.is_err(), "Caller deadline must cut the invocation short.");
	assert_eq!(sink.lines(), vec![format!("Executing GET on {}", server.url("/slow"))]);
}

#[tokio::test]
async fn host_documents_flow_through_unchanged() {
	let server = MockServer::start_async().await;
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/hooks").header("authorization", "Bearer doc-token");
			then.status(299).body("odd but fine");
		})
		.await;
	let config = ProvisionerConfig::from_value(serde_json::json!({
		"url": server.url("/hooks"),
		"method": "post",
		"json": "",
		"access_token": "doc-token",
	}))
	.expect("Host document should deserialize.");
	let sink = MemorySink::default();

	provisioner.apply(Invocation::new(&config, &sink)).await.expect("299 is inside the band.");

	mock.assert_async().await;

	assert_eq!(sink.lines().last().map(String::as_str), Some("odd but fine"));
}

#[tokio::test]
async fn truncated_success_body_is_a_transport_error() {
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let url = serve_raw_once(
		"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort",
		StdDuration::ZERO,
	);
	let config = ProvisionerConfig::new(url.as_str(), "GET").with_access_token("tok");
	let sink = MemorySink::default();
	let err = provisioner
		.apply(Invocation::new(&config, &sink))
		.await
		.expect_err("Truncated body after 200 must fail the invocation.");

	assert!(matches!(err, Error::Transport(TransportError::BodyRead { .. })));
	assert_eq!(sink.lines(), vec![format!("Executing GET on {url}")]);
}

#[tokio::test]
async fn failure_status_is_reported_without_waiting_for_the_body() {
	let (provisioner, _ambient) = build_test_provisioner(RecordingAmbient::issuing("unused"));
	let url = serve_raw_once(
		"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial",
		StdDuration::from_secs(10),
	);
	let config = ProvisionerConfig::new(url.as_str(), "GET").with_access_token("tok");
	let sink = MemorySink::default();
	let err = tokio::time::timeout(
		StdDuration::from_secs(2),
		provisioner.apply(Invocation::new(&config, &sink)),
	)
	.await
	.expect("A failure status must not wait for the rest of the body.")
	.expect_err("500 must fail the invocation.");

	assert!(matches!(err, Error::HttpStatus { code: 500 }));
	assert_eq!(sink.lines(), vec![format!("Executing GET on {url}")]);
}
