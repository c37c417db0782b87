//! Argon2id password hashing with constant-time verification.
//!
//! Stored credentials are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`). Verification
//! re-derives the hash using the salt and cost parameters embedded in the stored string, then
//! compares the two outputs in constant time, so plaintext proofs are never compared directly.

// crates.io
use argon2::{
	Algorithm, Argon2, Params, Version,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
// self
use crate::{_prelude::*, auth::Proof, error::ConfigError};

const SALT_LEN: usize = 16;

/// Error returned when text cannot be accepted as a stored password digest.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DigestError {
	/// The text is not a PHC-formatted hash (for example, a plaintext password).
	#[error("Password digest is not a valid PHC string.")]
	NotPhc,
	/// The PHC string names an algorithm other than Argon2.
	#[error("Password digest uses unsupported algorithm `{algorithm}`.")]
	UnsupportedAlgorithm {
		/// Algorithm identifier found in the PHC string.
		algorithm: String,
	},
}

/// Salted one-way password hash in PHC string form.
///
/// The raw string is only readable inside the crate; formatting is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordDigest(String);
impl PasswordDigest {
	/// Accepts an existing PHC string produced by an external registration service.
	pub fn from_phc(value: impl Into<String>) -> Result<Self, DigestError> {
		let value = value.into();

		validate_phc(&value)?;

		Ok(Self(value))
	}

	pub(crate) fn as_phc(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for PasswordDigest {
	type Error = DigestError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::from_phc(value)
	}
}
impl From<PasswordDigest> for String {
	fn from(value: PasswordDigest) -> Self {
		value.0
	}
}
impl Debug for PasswordDigest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("PasswordDigest").field(&"<redacted>").finish()
	}
}

/// Argon2id hasher carrying the cost parameters used for new digests.
#[derive(Clone, Debug, Default)]
pub struct CredentialHasher {
	params: Params,
}
impl CredentialHasher {
	/// Builds a hasher with explicit memory (KiB), iteration, and parallelism costs.
	pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, ConfigError> {
		let params = Params::new(m_cost, t_cost, p_cost, None).map_err(ConfigError::hash_params)?;

		Ok(Self { params })
	}

	/// Hashes a plaintext password with a fresh random salt.
	pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, ConfigError> {
		let salt_bytes: [u8; SALT_LEN] = rand::random();
		let salt = SaltString::encode_b64(&salt_bytes).map_err(ConfigError::hash_params)?;
		let hash = self
			.argon2()
			.hash_password(plaintext.as_bytes(), &salt)
			.map_err(ConfigError::hash_params)?;

		Ok(PasswordDigest(hash.to_string()))
	}

	/// Checks a proof against a stored digest in constant time.
	///
	/// Digests that fail to parse never match.
	pub fn verify(&self, proof: &Proof, digest: &PasswordDigest) -> bool {
		let Ok(parsed) = PasswordHash::new(digest.as_phc()) else {
			return false;
		};

		self.argon2().verify_password(proof.expose().as_bytes(), &parsed).is_ok()
	}

	fn argon2(&self) -> Argon2<'static> {
		Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
	}
}

fn validate_phc(value: &str) -> Result<(), DigestError> {
	let parsed = PasswordHash::new(value).map_err(|_| DigestError::NotPhc)?;

	if parsed.hash.is_none() || parsed.salt.is_none() {
		return Err(DigestError::NotPhc);
	}

	let algorithm = parsed.algorithm.as_str();

	if !algorithm.starts_with("argon2") {
		return Err(DigestError::UnsupportedAlgorithm { algorithm: algorithm.to_owned() });
	}

	Ok(())
}
