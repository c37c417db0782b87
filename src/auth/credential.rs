//! Stored credential records.

// self
use crate::{
	_prelude::*,
	auth::{PasswordDigest, PrincipalId},
};

/// Read-only credential record created by an external registration service.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Unique principal the record belongs to.
	pub principal_id: PrincipalId,
	password_hash: PasswordDigest,
	/// Registration instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl CredentialRecord {
	/// Builds a record from an already-hashed password.
	pub fn new(
		principal_id: PrincipalId,
		password_hash: PasswordDigest,
		created_at: OffsetDateTime,
	) -> Self {
		Self { principal_id, password_hash, created_at }
	}

	pub(crate) fn password_hash(&self) -> &PasswordDigest {
		&self.password_hash
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("principal_id", &self.principal_id)
			.field("password_hash", &"<redacted>")
			.field("created_at", &self.created_at)
			.finish()
	}
}
