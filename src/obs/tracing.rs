// self
use crate::{_prelude::*, handshake::HandshakeFailure, obs::HandshakeStage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedHandshake<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedHandshake<F> = F;

/// Span wrapping one handshake stage.
#[derive(Clone, Debug)]
pub struct HandshakeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl HandshakeSpan {
	/// Creates a new span tagged with the scheme name and stage.
	pub fn new(stage: HandshakeStage, scheme: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("appwrite_auth.handshake", scheme, stage = stage.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, scheme);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> HandshakeSpanGuard {
		#[cfg(feature = "tracing")]
		{
			HandshakeSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			HandshakeSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedHandshake<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`HandshakeSpan::entered`].
pub struct HandshakeSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for HandshakeSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("HandshakeSpanGuard(..)")
	}
}

/// Emits the log event for a failed callback inside the current span.
///
/// Client-driven failures log at `debug`; provider failures log at `warn` with the cause.
pub fn log_failure(failure: &HandshakeFailure) {
	#[cfg(feature = "tracing")]
	{
		match failure {
			HandshakeFailure::MissingParameter { name } => {
				tracing::debug!(parameter = *name, "Callback rejected: missing parameter.");
			},
			HandshakeFailure::InvalidSession => {
				tracing::debug!("Callback rejected: provider returned no session.");
			},
			HandshakeFailure::Provider(cause) => {
				tracing::warn!(error = %cause, ?cause, "Callback failed: provider error.");
			},
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = failure;
	}
}
