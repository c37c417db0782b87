//! Observability helpers shared by the verifier and issuer.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `authgate.operation` with the `operation`
//!   and `stage` (call site) fields. `outcome` and `reason` are filled in once the operation
//!   settles.
//! - Enable `metrics` to increment `authgate_operation_total` (labeled by `operation` and
//!   `outcome`) and, on failure, `authgate_failure_total` (labeled by `operation` and `reason`).
//!
//! [`redact`] is always available and masks secrets in free text before it reaches a log line.

mod metrics;
mod tracing;

pub mod redact;

pub use metrics::*;
pub use redact::redact;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Credential verification followed by issuance.
	Authenticate,
	/// Token minting.
	Issue,
	/// Token validation.
	Validate,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "authenticate",
			OperationKind::Issue => "issue",
			OperationKind::Validate => "validate",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps an optional failure reason onto its outcome label.
	pub const fn of(failure: Option<&'static str>) -> Self {
		match failure {
			None => OperationOutcome::Success,
			Some(_) => OperationOutcome::Failure,
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Settles an operation: stamps `outcome`/`reason` on the span and bumps the counters.
///
/// `failure` is the stable reason label (an [`Error::code`] or an audit reason), `None` on
/// success.
pub fn finish(span: &OperationSpan, kind: OperationKind, failure: Option<&'static str>) {
	let outcome = OperationOutcome::of(failure);

	span.settle(outcome, failure);
	record_outcome(kind, outcome);

	if let Some(reason) = failure {
		record_failure(kind, reason);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn failure_reasons_decide_the_outcome() {
		assert_eq!(OperationOutcome::of(None), OperationOutcome::Success);
		assert_eq!(OperationOutcome::of(Some("token_expired")), OperationOutcome::Failure);
	}

	#[test]
	fn finishing_is_safe_without_subscribers_or_recorders() {
		let span = OperationSpan::new(OperationKind::Validate, "finish");

		finish(&span, OperationKind::Validate, Some(Error::TokenExpired.code()));
		finish(&span, OperationKind::Validate, None);
	}
}
