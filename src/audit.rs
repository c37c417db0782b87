//! Audit events emitted by the verifier for every authentication attempt.
//!
//! Failure reasons are richer than the error a caller sees: the sink learns whether the
//! principal was unknown or the proof was wrong, the caller only learns
//! [`Error::InvalidCredentials`].

// self
use crate::_prelude::*;

/// Why an authentication attempt failed, as recorded for operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
	/// Principal id or proof violated input constraints.
	MalformedRequest,
	/// No credential record exists for the principal.
	UnknownPrincipal,
	/// The proof did not match the stored digest.
	PasswordMismatch,
	/// The credential store failed.
	StoreUnavailable,
	/// Credentials matched but the issuer could not mint a token.
	IssuerFailure,
}
impl FailureReason {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::MalformedRequest => "malformed_request",
			Self::UnknownPrincipal => "unknown_principal",
			Self::PasswordMismatch => "password_mismatch",
			Self::StoreUnavailable => "store_unavailable",
			Self::IssuerFailure => "issuer_failure",
		}
	}
}

/// Result of a single authentication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AuditOutcome {
	/// A token was issued.
	Success,
	/// The attempt was rejected.
	Failure(FailureReason),
}

/// One audit record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
	/// Principal id exactly as presented by the caller.
	pub principal: String,
	/// Attempt outcome.
	pub outcome: AuditOutcome,
	/// Instant the attempt finished.
	#[serde(with = "time::serde::rfc3339")]
	pub at: OffsetDateTime,
}
impl AuditEvent {
	/// Builds an event stamped with the current UTC clock.
	pub fn now(principal: impl Into<String>, outcome: AuditOutcome) -> Self {
		Self { principal: principal.into(), outcome, at: OffsetDateTime::now_utc() }
	}
}

/// External observability collaborator receiving audit events.
///
/// Implementations must not block; forward to a queue if delivery is slow.
pub trait AuditSink
where
	Self: Send + Sync,
{
	/// Records one event.
	fn record(&self, event: AuditEvent);
}

/// Writes audit events to the `audit` tracing target (no-op without the `tracing` feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;
impl AuditSink for TracingAuditSink {
	fn record(&self, event: AuditEvent) {
		#[cfg(feature = "tracing")]
		{
			let principal = crate::obs::redact(&event.principal);

			match event.outcome {
				AuditOutcome::Success => tracing::info!(
					target: "audit",
					event = "auth_success",
					principal = %principal,
					at = %event.at,
				),
				AuditOutcome::Failure(reason) => tracing::warn!(
					target: "audit",
					event = "auth_failure",
					principal = %principal,
					reason = reason.as_str(),
					at = %event.at,
				),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = event;
		}
	}
}

/// Keeps audit events in memory; useful for tests and in-process inspection.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuditSink(Arc<Mutex<Vec<AuditEvent>>>);
impl MemoryAuditSink {
	/// Returns a copy of the recorded events in arrival order.
	pub fn events(&self) -> Vec<AuditEvent> {
		self.0.lock().clone()
	}

	/// Removes and returns all recorded events.
	pub fn drain(&self) -> Vec<AuditEvent> {
		std::mem::take(&mut *self.0.lock())
	}
}
impl AuditSink for MemoryAuditSink {
	fn record(&self, event: AuditEvent) {
		self.0.lock().push(event);
	}
}
