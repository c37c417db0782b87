// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"authgate_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a failure reason via the global metrics recorder (when enabled).
///
/// `reason` must come from a closed set of labels to keep cardinality bounded.
pub fn record_failure(kind: OperationKind, reason: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"authgate_failure_total",
			"operation" => kind.as_str(),
			"reason" => reason
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_outcome_is_safe_without_a_recorder() {
		record_outcome(OperationKind::Authenticate, OperationOutcome::Failure);
		record_failure(OperationKind::Authenticate, "unknown_principal");
	}
}
