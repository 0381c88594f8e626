//! Operator-facing progress output.

// self
use crate::_prelude::*;

/// Append-only channel the host exposes for human-readable status text.
pub trait ProgressSink
where
	Self: Send + Sync,
{
	/// Emits one line.
	fn output(&self, line: &str);
}
impl<F> ProgressSink for F
where
	F: Fn(&str) + Send + Sync,
{
	fn output(&self, line: &str) {
		self(line)
	}
}

/// Sink that records every line in memory, for hosts that buffer output and for tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySink(Arc<Mutex<Vec<String>>>);
impl MemorySink {
	/// Snapshot of the lines emitted so far.
	pub fn lines(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}
impl ProgressSink for MemorySink {
	fn output(&self, line: &str) {
		self.0.lock().push(line.to_owned());
	}
}

/// Sink that forwards every line as an `INFO` event on the `rest_provisioner::output` target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
#[cfg(feature = "tracing")]
impl ProgressSink for TracingSink {
	fn output(&self, line: &str) {
		tracing::info!(target: "rest_provisioner::output", "{line}");
	}
}
