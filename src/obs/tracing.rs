// self
use crate::{_prelude::*, obs::Stage};

/// Span covering one invocation stage.
#[cfg(feature = "tracing")]
pub type StageSpan = tracing::Span;
/// Zero-sized stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Clone, Debug, Default)]
pub struct StageSpan;

/// Future type produced by [`instrument_stage`].
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// Opens the `rest_provisioner.invocation` span for `stage`.
pub fn stage_span(stage: Stage) -> StageSpan {
	#[cfg(feature = "tracing")]
	{
		tracing::info_span!("rest_provisioner.invocation", stage = stage.as_str())
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = stage;

		StageSpan
	}
}

/// Runs `f` with `span` entered.
pub fn in_stage<T, F>(span: &StageSpan, f: F) -> T
where
	F: FnOnce() -> T,
{
	#[cfg(feature = "tracing")]
	{
		span.in_scope(f)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = span;

		f()
	}
}

/// Attaches `span` to `fut` so no guard is held across `.await` points.
pub fn instrument_stage<Fut>(span: StageSpan, fut: Fut) -> InstrumentedStage<Fut>
where
	Fut: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		fut.instrument(span)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = span;

		fut
	}
}

/// Emits a `DEBUG` event marking a completed stage.
pub fn record_stage_completion(stage: Stage) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(stage = stage.as_str(), "Provisioner stage completed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = stage;
	}
}

/// Emits a `WARN` event describing a failed stage.
pub fn record_stage_failure(stage: Stage, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(stage = stage.as_str(), error = %error, "Provisioner stage failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (stage, error);
	}
}
