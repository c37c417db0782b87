//! Process-wide configuration, loaded once at startup and injected into each component.
//!
//! The file carries secret *references* only. Signing material is resolved through the
//! configured [`SecretSource`] when the issuer is loaded.

// std
use std::{
	net::SocketAddr,
	path::{Path, PathBuf},
	time::Duration as StdDuration,
};
// crates.io
use url::Url;
// self
use crate::{
	_prelude::*,
	auth::CredentialHasher,
	error::ConfigError,
	issuer::SigningAlgorithm,
	secret::{EnvSecretSource, SecretSource},
};

const DEFAULT_LIFETIME_SECS: i64 = 3_600;
const MAX_LIFETIME_SECS: i64 = 30 * 24 * 3_600;

/// Top-level configuration document.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Token issuer settings.
	pub issuer: IssuerConfig,
	/// Where signing material is fetched from.
	#[serde(default)]
	pub secrets: SecretsConfig,
	/// Credential store settings.
	pub store: StoreConfig,
	/// HTTP surface settings.
	#[serde(default)]
	pub server: ServerConfig,
	/// Cost parameters for password hashing.
	#[serde(default)]
	pub hashing: HashingConfig,
}
impl Config {
	/// Reads and validates a JSON configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let bytes = std::fs::read(path)?;

		Self::from_slice(&bytes)
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_slice(bytes);
		let config: Self = serde_path_to_error::deserialize(de)?;

		config.issuer.validate()?;
		config.server.validate()?;
		config.hashing.hasher()?;

		Ok(config)
	}
}

/// Token issuer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerConfig {
	/// Value stamped into the `iss` claim.
	pub issuer: String,
	/// Value stamped into the `aud` claim.
	pub audience: String,
	/// Token lifetime in seconds.
	#[serde(default = "default_lifetime_secs")]
	pub token_lifetime_secs: i64,
	/// HMAC algorithm used for signatures.
	#[serde(default)]
	pub algorithm: SigningAlgorithm,
	/// Name of the secret holding the base64 signing key.
	pub signing_key: String,
}
impl IssuerConfig {
	/// Creates settings with the default one-hour lifetime and `HS256`.
	pub fn new(
		issuer: impl Into<String>,
		audience: impl Into<String>,
		signing_key: impl Into<String>,
	) -> Self {
		Self {
			issuer: issuer.into(),
			audience: audience.into(),
			token_lifetime_secs: DEFAULT_LIFETIME_SECS,
			algorithm: SigningAlgorithm::default(),
			signing_key: signing_key.into(),
		}
	}

	/// Overrides the token lifetime.
	pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
		self.token_lifetime_secs = lifetime.whole_seconds();

		self
	}

	/// Overrides the signing algorithm.
	pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
		self.algorithm = algorithm;

		self
	}

	/// Token lifetime as a duration.
	pub fn lifetime(&self) -> Duration {
		Duration::seconds(self.token_lifetime_secs)
	}

	/// Checks lifetimes and required strings.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.issuer.trim().is_empty() {
			return Err(ConfigError::EmptySetting { field: "issuer" });
		}
		if self.audience.trim().is_empty() {
			return Err(ConfigError::EmptySetting { field: "audience" });
		}
		if self.signing_key.trim().is_empty() {
			return Err(ConfigError::EmptySetting { field: "signing_key" });
		}
		if self.token_lifetime_secs <= 0 {
			return Err(ConfigError::NonPositiveLifetime);
		}
		if self.token_lifetime_secs > MAX_LIFETIME_SECS {
			return Err(ConfigError::LifetimeOutOfRange { max_secs: MAX_LIFETIME_SECS });
		}

		Ok(())
	}
}

/// Secret-management collaborator selection.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecretsConfig {
	/// Secret names are environment variables.
	#[default]
	Env,
	/// Secret names are fields of one Vault KV v2 secret.
	Vault {
		/// Vault base address.
		address: Url,
		/// KV v2 mount.
		#[serde(default = "default_vault_mount")]
		mount: String,
		/// Secret path under the mount.
		path: String,
		/// Environment variable holding the Vault token.
		#[serde(default = "default_vault_token_env")]
		token_env: String,
	},
}
impl SecretsConfig {
	/// Builds the configured secret source.
	pub fn build(&self) -> Result<Arc<dyn SecretSource>, ConfigError> {
		match self {
			Self::Env => Ok(Arc::new(EnvSecretSource)),
			#[cfg(feature = "reqwest")]
			Self::Vault { address, mount, path, token_env } => {
				let token = std::env::var(token_env)
					.ok()
					.filter(|token| !token.trim().is_empty())
					.ok_or_else(|| crate::secret::SecretError::MissingCredential {
						name: token_env.to_owned(),
					})?;
				let source = crate::secret::VaultSecretSource::new(
					address,
					mount,
					path,
					crate::auth::TokenSecret::new(token),
				)?;

				Ok(Arc::new(source))
			},
			#[cfg(not(feature = "reqwest"))]
			Self::Vault { .. } => Err(ConfigError::FeatureDisabled { feature: "reqwest" }),
		}
	}
}

/// Credential store settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
	/// JSON file holding exported credential records.
	pub path: PathBuf,
}

/// HTTP surface settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
	/// Listen address.
	pub bind: SocketAddr,
	/// Per-request deadline for verification, in milliseconds.
	pub request_timeout_ms: u64,
}
impl ServerConfig {
	/// Per-request deadline as a std duration.
	pub fn request_timeout(&self) -> StdDuration {
		StdDuration::from_millis(self.request_timeout_ms)
	}

	/// Rejects a zero deadline, which would fail every request.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.request_timeout_ms == 0 {
			return Err(ConfigError::ZeroSetting { field: "request_timeout_ms" });
		}

		Ok(())
	}
}
impl Default for ServerConfig {
	fn default() -> Self {
		Self { bind: SocketAddr::from(([127, 0, 0, 1], 8080)), request_timeout_ms: 3_000 }
	}
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashingConfig {
	/// Memory cost in KiB.
	pub m_cost: u32,
	/// Iteration count.
	pub t_cost: u32,
	/// Degree of parallelism.
	pub p_cost: u32,
}
impl HashingConfig {
	/// Builds the matching hasher.
	pub fn hasher(&self) -> Result<CredentialHasher, ConfigError> {
		CredentialHasher::with_params(self.m_cost, self.t_cost, self.p_cost)
	}
}
impl Default for HashingConfig {
	fn default() -> Self {
		Self { m_cost: 19_456, t_cost: 2, p_cost: 1 }
	}
}

fn default_lifetime_secs() -> i64 {
	DEFAULT_LIFETIME_SECS
}

fn default_vault_mount() -> String {
	"secret".into()
}

fn default_vault_token_env() -> String {
	"VAULT_TOKEN".into()
}
