//! Thread-safe in-memory [`CredentialStore`] for tests and embedding.

// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, PrincipalId},
	store::{CredentialStore, StoreFuture},
};

type RecordMap = Arc<RwLock<HashMap<PrincipalId, CredentialRecord>>>;

/// Keeps credential records in-process.
///
/// [`insert`](Self::insert) stands in for the external registration service.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialStore(RecordMap);
impl MemoryCredentialStore {
	/// Adds or replaces the record for its principal, returning the previous one.
	pub fn insert(&self, record: CredentialRecord) -> Option<CredentialRecord> {
		self.0.write().insert(record.principal_id.clone(), record)
	}

	/// Removes the record for `principal_id`.
	pub fn remove(&self, principal_id: &str) -> Option<CredentialRecord> {
		self.0.write().remove(principal_id)
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no records are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl FromIterator<CredentialRecord> for MemoryCredentialStore {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = CredentialRecord>,
	{
		let map = iter.into_iter().map(|record| (record.principal_id.clone(), record)).collect();

		Self(Arc::new(RwLock::new(map)))
	}
}
impl CredentialStore for MemoryCredentialStore {
	fn lookup<'a>(&'a self, principal_id: &'a PrincipalId) -> StoreFuture<'a, Option<CredentialRecord>> {
		let record = self.0.read().get(principal_id).cloned();

		Box::pin(async move { Ok(record) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	fn record(principal: &str) -> CredentialRecord {
		let digest = test_hasher().hash("pw").expect("Fixture proof should hash.");

		CredentialRecord::new(
			PrincipalId::new(principal).expect("Fixture principal should be valid."),
			digest,
			OffsetDateTime::now_utc(),
		)
	}

	#[tokio::test]
	async fn lookup_returns_inserted_records_only() {
		let store = MemoryCredentialStore::default();
		let alice = PrincipalId::new("alice").expect("Fixture principal should be valid.");
		let ghost = PrincipalId::new("ghost").expect("Fixture principal should be valid.");

		assert!(store.insert(record("alice")).is_none());

		let found = store.lookup(&alice).await.expect("Memory lookups should not fail.");

		assert_eq!(found.map(|record| record.principal_id), Some(alice));
		assert!(store.lookup(&ghost).await.expect("Memory lookups should not fail.").is_none());
	}

	#[tokio::test]
	async fn clones_share_state_and_removal_hides_records() {
		let store: MemoryCredentialStore = [record("alice"), record("bob")].into_iter().collect();
		let view = store.clone();
		let bob = PrincipalId::new("bob").expect("Fixture principal should be valid.");

		assert_eq!(view.len(), 2);
		assert!(store.remove("bob").is_some());
		assert!(view.lookup(&bob).await.expect("Memory lookups should not fail.").is_none());
		assert_eq!(view.len(), 1);
	}
}
