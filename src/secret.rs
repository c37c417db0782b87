//! Secret-management collaborators that resolve signing material by name at startup.
//!
//! Configuration files only carry secret *names*; values are fetched from one of these sources
//! once, when the [`TokenIssuer`](crate::issuer::TokenIssuer) is loaded.

pub mod env;
pub mod fixed;
#[cfg(feature = "reqwest")] pub mod vault;

pub use env::EnvSecretSource;
pub use fixed::StaticSecretSource;
#[cfg(feature = "reqwest")] pub use vault::VaultSecretSource;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SecretSource::fetch`].
pub type SecretFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<String>, SecretError>> + 'a + Send>>;

/// Read-only lookup of named secrets.
pub trait SecretSource
where
	Self: Send + Sync,
{
	/// Fetches the secret stored under `name`; `Ok(None)` when the source has no such entry.
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a>;
}

/// Failures raised while talking to a secret source.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SecretError {
	/// The source could not be reached or answered with an unexpected status.
	#[error("Secret source request failed: {message}.")]
	Unavailable {
		/// Redacted description of the failure.
		message: String,
	},
	/// The source answered with a payload that could not be parsed.
	#[error("Secret source returned a malformed payload at `{path}`.")]
	Malformed {
		/// JSON path of the failing field.
		path: String,
	},
	/// Bootstrap credentials for the source itself are missing.
	#[error("Secret source credential `{name}` is not set.")]
	MissingCredential {
		/// Name of the missing bootstrap credential.
		name: String,
	},
}
