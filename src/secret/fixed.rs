//! In-process secret source for tests and embedding.

// self
use crate::{
	_prelude::*,
	secret::{SecretFuture, SecretSource},
};

/// Secret source backed by a fixed map handed over at construction.
#[derive(Clone, Default)]
pub struct StaticSecretSource(HashMap<String, String>);
impl StaticSecretSource {
	/// Adds or replaces a named secret.
	pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(name.into(), value.into());

		self
	}
}
impl SecretSource for StaticSecretSource {
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a> {
		let value = self.0.get(name).cloned();

		Box::pin(async move { Ok(value) })
	}
}
impl Debug for StaticSecretSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StaticSecretSource").field("names", &self.0.keys().collect::<Vec<_>>()).finish()
	}
}
