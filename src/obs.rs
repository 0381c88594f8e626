//! Optional observability helpers for provisioner invocations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `rest_provisioner.invocation` with a `stage`
//!   field, a `DEBUG` event when a stage completes and a `WARN` event when one fails.
//! - Enable `metrics` to increment the `rest_provisioner_invocation_total` counter for every
//!   stage attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Stages of a single invocation, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Semantic configuration checks.
	Validate,
	/// Static or ambient token resolution.
	ResolveToken,
	/// Network round trip.
	Execute,
	/// Status classification.
	Classify,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Validate => "validate",
			Stage::ResolveToken => "resolve_token",
			Stage::Execute => "execute",
			Stage::Classify => "classify",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the host.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs a synchronous stage inside its span and records the outcome.
pub fn observe<T, E, F>(stage: Stage, f: F) -> Result<T, E>
where
	E: Display,
	F: FnOnce() -> Result<T, E>,
{
	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = in_stage(&stage_span(stage), f);

	record_result(stage, &result);

	result
}

/// Runs an asynchronous stage inside its span and records the outcome.
pub async fn observe_async<T, E, Fut>(stage: Stage, fut: Fut) -> Result<T, E>
where
	E: Display,
	Fut: Future<Output = Result<T, E>>,
{
	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = instrument_stage(stage_span(stage), fut).await;

	record_result(stage, &result);

	result
}

fn record_result<T, E>(stage: Stage, result: &Result<T, E>)
where
	E: Display,
{
	match result {
		Ok(_) => {
			record_stage_completion(stage);
			record_stage_outcome(stage, StageOutcome::Success);
		},
		Err(e) => {
			record_stage_failure(stage, e);
			record_stage_outcome(stage, StageOutcome::Failure);
		},
	}
}
