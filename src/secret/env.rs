//! Environment-variable secret source.

// self
use crate::{
	_prelude::*,
	secret::{SecretFuture, SecretSource},
};

/// Resolves secret names as process environment variables.
///
/// Empty variables count as missing.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvSecretSource;
impl SecretSource for EnvSecretSource {
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a> {
		let value = std::env::var(name).ok().filter(|value| !value.trim().is_empty());

		Box::pin(async move { Ok(value) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn unset_variables_resolve_to_none() {
		let value = EnvSecretSource
			.fetch("AUTHGATE_TEST_VARIABLE_THAT_IS_NEVER_SET")
			.await
			.expect("Environment lookups should not fail.");

		assert!(value.is_none());
	}

	#[tokio::test]
	async fn set_variables_are_returned() {
		let value = EnvSecretSource.fetch("PATH").await.expect("Environment lookups should not fail.");

		assert!(value.is_some_and(|path| !path.is_empty()));
	}
}
