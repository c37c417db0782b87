//! JSON-file-backed [`CredentialStore`] for small deployments.
//!
//! The file holds an array of credential records exported by the registration service. It is
//! read at [`open`](FileCredentialStore::open) and on explicit [`reload`](FileCredentialStore::reload);
//! the store never writes it.

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, PrincipalId},
	obs,
	store::{CredentialStore, StoreError, StoreFuture},
};

type Snapshot = HashMap<PrincipalId, CredentialRecord>;

/// Serves lookups from an in-memory snapshot of a JSON credential file.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileCredentialStore {
	/// Opens the store, eagerly loading the file; a missing or empty file yields an empty store.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();
		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Re-reads the file and atomically swaps the snapshot, returning the new record count.
	///
	/// On failure the previous snapshot stays in place.
	pub fn reload(&self) -> Result<usize, StoreError> {
		let snapshot = Self::load_snapshot(&self.path)?;
		let count = snapshot.len();

		*self.inner.write() = snapshot;

		Ok(count)
	}

	/// Path the store reads from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Number of records in the current snapshot.
	pub fn len(&self) -> usize {
		self.inner.read().len()
	}

	/// Returns `true` when the current snapshot holds no records.
	pub fn is_empty(&self) -> bool {
		self.inner.read().is_empty()
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: obs::redact(&format!("Failed to read {}: {e}", path.display())),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(HashMap::new());
		}

		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let records: Vec<CredentialRecord> =
			serde_path_to_error::deserialize(de).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {} at `{}`", path.display(), e.path()),
			})?;
		let mut snapshot = HashMap::with_capacity(records.len());

		for record in records {
			let principal = record.principal_id.clone();

			if snapshot.insert(principal.clone(), record).is_some() {
				return Err(StoreError::Serialization {
					message: format!("Duplicate principal `{principal}` in {}", path.display()),
				});
			}
		}

		Ok(snapshot)
	}
}
impl CredentialStore for FileCredentialStore {
	fn lookup<'a>(&'a self, principal_id: &'a PrincipalId) -> StoreFuture<'a, Option<CredentialRecord>> {
		let record = self.inner.read().get(principal_id).cloned();

		Box::pin(async move { Ok(record) })
	}
}
