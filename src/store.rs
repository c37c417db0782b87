//! Credential store contract and built-in read-only implementations.

pub mod file;
pub mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, PrincipalId},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Read-only lookup of credential records.
///
/// Registration and rotation belong to external services; the verifier only reads.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the record for `principal_id`; `Ok(None)` means the principal is unknown.
	fn lookup<'a>(&'a self, principal_id: &'a PrincipalId) -> StoreFuture<'a, Option<CredentialRecord>>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Stored data could not be decoded.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (I/O, network, timeouts).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_errors_serialize_for_diagnostics() {
		let error = StoreError::Serialization { message: "line 3".into() };
		let payload = serde_json::to_string(&error).expect("Store errors should serialize.");

		assert_eq!(payload, "{\"Serialization\":{\"message\":\"line 3\"}}");
		assert_eq!(error.to_string(), "Serialization error: line 3.");
	}
}
