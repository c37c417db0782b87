//! Crate-level error taxonomy shared by the verifier, issuer, stores, and configuration loaders.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Messages never carry secret material; the wrapped sources of [`Error::StoreUnavailable`] and
/// [`Error::Config`] are meant for operators, not for callers across a service boundary.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Unknown principal or wrong proof; the two cases are deliberately indistinguishable.
	#[error("Invalid credentials.")]
	InvalidCredentials,
	/// Token signature verified but its expiry instant has passed.
	#[error("Token has expired.")]
	TokenExpired,
	/// Token signature does not match the issuer's signing key.
	#[error("Token signature is invalid.")]
	TokenInvalidSignature,
	/// Token could not be decoded or is missing required claims.
	#[error("Token is malformed.")]
	TokenMalformed,
	/// Token is authentic but was minted for another issuer or audience.
	#[error("Token `{claim}` claim does not match this issuer.")]
	TokenClaimsMismatch {
		/// Name of the mismatching claim (`iss` or `aud`).
		claim: &'static str,
	},
	/// Credential store could not be reached; retry with backoff.
	#[error("Credential store is unavailable.")]
	StoreUnavailable(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem; fatal at startup.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns `true` when the failure is transient and the caller may retry with backoff.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::StoreUnavailable(_))
	}

	/// Stable, secret-free label suitable for wire responses and metric labels.
	pub const fn code(&self) -> &'static str {
		match self {
			Self::InvalidCredentials => "invalid_credentials",
			Self::TokenExpired => "token_expired",
			Self::TokenInvalidSignature => "token_invalid_signature",
			Self::TokenMalformed => "token_malformed",
			Self::TokenClaimsMismatch { .. } => "token_claims_mismatch",
			Self::StoreUnavailable(_) => "store_unavailable",
			Self::Config(_) => "configuration_error",
		}
	}
}

/// Configuration and startup failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The secret source has no value under the configured name.
	#[error("Signing key `{name}` was not found in the secret source.")]
	MissingSigningKey {
		/// Secret reference that could not be resolved.
		name: String,
	},
	/// The signing key is not valid base64.
	#[error("Signing key `{name}` is not valid base64.")]
	SigningKeyEncoding {
		/// Secret reference that held the malformed value.
		name: String,
	},
	/// The signing key is too short for the configured algorithm.
	#[error("Signing key must be at least {min} bytes, got {actual}.")]
	WeakSigningKey {
		/// Minimum accepted length in bytes.
		min: usize,
		/// Observed length in bytes.
		actual: usize,
	},
	/// The secret source itself failed.
	#[error("Secret source failed.")]
	SecretSource(#[from] crate::secret::SecretError),
	/// Token lifetime must be positive.
	#[error("Token lifetime must be positive.")]
	NonPositiveLifetime,
	/// Token lifetime exceeds the supported range.
	#[error("Token lifetime exceeds {max_secs} seconds.")]
	LifetimeOutOfRange {
		/// Maximum accepted lifetime in seconds.
		max_secs: i64,
	},
	/// Issuer or audience strings are empty.
	#[error("The `{field}` setting cannot be empty.")]
	EmptySetting {
		/// Name of the empty setting.
		field: &'static str,
	},
	/// A numeric setting that must be positive is zero.
	#[error("The `{field}` setting must be positive.")]
	ZeroSetting {
		/// Name of the zero setting.
		field: &'static str,
	},
	/// Password hashing parameters were rejected.
	#[error("Password hashing parameters are invalid.")]
	HashParams {
		/// Underlying hashing failure.
		#[source]
		source: BoxError,
	},
	/// The issuer failed to sign a token.
	#[error("Token signing failed.")]
	Signing {
		/// Underlying signing failure.
		#[source]
		source: BoxError,
	},
	/// The configuration asks for a capability this build does not include.
	#[error("This build lacks the `{feature}` feature.")]
	FeatureDisabled {
		/// Cargo feature that would enable the capability.
		feature: &'static str,
	},
	/// Configuration file could not be read.
	#[error("Configuration file could not be read.")]
	Io(#[from] std::io::Error),
	/// Configuration file contains an invalid field.
	#[error("Configuration is invalid at `{path}`.")]
	Parse {
		/// JSON path of the failing field.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a password hashing failure.
	pub fn hash_params(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HashParams { source: Box::new(src) }
	}

	/// Wraps a token signing failure.
	pub fn signing(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Signing { source: Box::new(src) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_transient_error_with_source() {
		let store_error = StoreError::Backend { message: "connection refused".into() };
		let error: Error = store_error.clone().into();

		assert!(error.is_transient());
		assert_eq!(error.code(), "store_unavailable");
		assert!(!error.to_string().contains("connection refused"));

		let source = StdError::source(&error)
			.expect("Store errors should stay reachable through the source chain.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn credential_failures_are_not_transient() {
		assert!(!Error::InvalidCredentials.is_transient());
		assert!(!Error::TokenExpired.is_transient());
		assert!(!Error::from(ConfigError::NonPositiveLifetime).is_transient());
	}

	#[test]
	fn parse_errors_keep_the_json_path() {
		#[derive(Debug, Deserialize)]
		struct Outer {
			#[allow(dead_code)]
			inner: Inner,
		}
		#[derive(Debug, Deserialize)]
		struct Inner {
			#[allow(dead_code)]
			port: u16,
		}

		let de = &mut serde_json::Deserializer::from_str("{\"inner\":{\"port\":\"x\"}}");
		let err = serde_path_to_error::deserialize::<_, Outer>(de)
			.expect_err("String ports should be rejected.");
		let config_error = ConfigError::from(err);

		assert!(matches!(&config_error, ConfigError::Parse { path, .. } if path == "inner.port"));
	}
}
