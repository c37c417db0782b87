//! Credential verifier: checks a principal's proof and delegates issuance on success.
//!
//! Callers only ever see [`Error::InvalidCredentials`] for a bad id, an unknown principal, or a
//! wrong proof. The precise reason goes to the [`AuditSink`].

// self
use crate::{
	_prelude::*,
	audit::{AuditEvent, AuditOutcome, AuditSink, FailureReason},
	auth::{CredentialHasher, PasswordDigest, PrincipalId, Proof},
	error::ConfigError,
	issuer::{Token, TokenIssuer},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	store::CredentialStore,
};

const PROOF_MAX_LEN: usize = 1_024;
const AUDIT_PRINCIPAL_MAX_CHARS: usize = 128;

type Rejection = (FailureReason, Error);

/// Verifies `(principal_id, proof)` pairs against the credential store and mints tokens.
///
/// The verifier holds no per-request state; share it behind an [`Arc`].
pub struct CredentialVerifier {
	store: Arc<dyn CredentialStore>,
	issuer: Arc<TokenIssuer>,
	audit: Arc<dyn AuditSink>,
	hasher: CredentialHasher,
	dummy: PasswordDigest,
}
impl CredentialVerifier {
	/// Wires the verifier to its collaborators.
	///
	/// Hashes a random throwaway proof with `hasher` so unknown principals cost the same
	/// Argon2 work as known ones.
	pub fn new(
		store: Arc<dyn CredentialStore>,
		issuer: Arc<TokenIssuer>,
		audit: Arc<dyn AuditSink>,
		hasher: CredentialHasher,
	) -> Result<Self, ConfigError> {
		let throwaway = rand::random::<u128>().to_string();
		let dummy = hasher.hash(&throwaway)?;

		Ok(Self { store, issuer, audit, hasher, dummy })
	}

	/// Issuer used for successful verifications.
	pub fn issuer(&self) -> &TokenIssuer {
		&self.issuer
	}

	/// Verifies the proof for `principal_id` and issues a token on success.
	///
	/// Every call emits exactly one audit event, including calls whose future is dropped before
	/// completion (recorded as [`FailureReason::StoreUnavailable`]).
	pub async fn verify(&self, principal_id: &str, proof: &Proof) -> Result<Token> {
		let span = OperationSpan::new(OperationKind::Authenticate, "verify");
		let mut record = AttemptRecord::arm(self.audit.as_ref(), &span, principal_id);

		match span.instrument(self.attempt(principal_id, proof)).await {
			Ok(token) => {
				record.settle(AuditOutcome::Success);

				Ok(token)
			},
			Err((reason, e)) => {
				record.settle(AuditOutcome::Failure(reason));

				Err(e)
			},
		}
	}

	async fn attempt(&self, principal_id: &str, proof: &Proof) -> Result<Token, Rejection> {
		let principal = match PrincipalId::new(principal_id) {
			Ok(principal) if !proof.is_empty() && proof.expose().len() <= PROOF_MAX_LEN => principal,
			_ => {
				self.burn(proof).await;

				return Err((FailureReason::MalformedRequest, Error::InvalidCredentials));
			},
		};
		let record = self.store.lookup(&principal).await.map_err(|e| {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %obs::redact(&e.to_string()), "credential store lookup failed");

			(FailureReason::StoreUnavailable, Error::from(e))
		})?;
		let Some(record) = record else {
			self.burn(proof).await;

			return Err((FailureReason::UnknownPrincipal, Error::InvalidCredentials));
		};

		if !self.check(proof, record.password_hash()).await {
			return Err((FailureReason::PasswordMismatch, Error::InvalidCredentials));
		}

		self.issuer.issue(&principal).map_err(|e| {
			#[cfg(feature = "tracing")]
			tracing::error!(error = %e, "token issuance failed after successful verification");

			(FailureReason::IssuerFailure, e)
		})
	}

	// Spends one verification on the throwaway digest; the outcome is irrelevant.
	async fn burn(&self, proof: &Proof) {
		let _ = self.check(proof, &self.dummy).await;
	}

	// Argon2 is CPU-bound; with a runtime available it runs on the blocking pool so a request
	// deadline can fire and the worker thread stays free.
	#[cfg(feature = "server")]
	async fn check(&self, proof: &Proof, digest: &PasswordDigest) -> bool {
		let hasher = self.hasher.clone();
		let proof = proof.clone();
		let digest = digest.clone();

		tokio::task::spawn_blocking(move || hasher.verify(&proof, &digest)).await.unwrap_or(false)
	}

	#[cfg(not(feature = "server"))]
	async fn check(&self, proof: &Proof, digest: &PasswordDigest) -> bool {
		self.hasher.verify(proof, digest)
	}
}
impl Debug for CredentialVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialVerifier")
			.field("issuer", &self.issuer)
			.field("hasher", &self.hasher)
			.finish_non_exhaustive()
	}
}

/// Audit and metrics bookkeeping for one attempt, emitted when dropped.
///
/// Armed before the first `.await`, so an attempt cancelled by a caller's deadline still leaves
/// exactly one event.
struct AttemptRecord<'a> {
	audit: &'a dyn AuditSink,
	span: &'a OperationSpan,
	principal: String,
	outcome: Option<AuditOutcome>,
}
impl<'a> AttemptRecord<'a> {
	fn arm(audit: &'a dyn AuditSink, span: &'a OperationSpan, principal_id: &str) -> Self {
		obs::record_outcome(OperationKind::Authenticate, OperationOutcome::Attempt);

		Self {
			audit,
			span,
			principal: principal_id.chars().take(AUDIT_PRINCIPAL_MAX_CHARS).collect(),
			outcome: None,
		}
	}

	fn settle(&mut self, outcome: AuditOutcome) {
		self.outcome = Some(outcome);
	}
}
impl Drop for AttemptRecord<'_> {
	fn drop(&mut self) {
		let outcome = self.outcome.take().unwrap_or_else(|| {
			#[cfg(feature = "tracing")]
			tracing::warn!("verification dropped before completion");

			AuditOutcome::Failure(FailureReason::StoreUnavailable)
		});
		let failure = match outcome {
			AuditOutcome::Success => None,
			AuditOutcome::Failure(reason) => Some(reason.as_str()),
		};

		self.audit.record(AuditEvent::now(std::mem::take(&mut self.principal), outcome));
		obs::finish(self.span, OperationKind::Authenticate, failure);
	}
}
