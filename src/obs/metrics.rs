// self
use crate::obs::{HandshakeStage, StageOutcome};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_handshake_outcome(stage: HandshakeStage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"appwrite_auth_handshake_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}
