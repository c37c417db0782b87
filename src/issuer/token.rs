//! Immutable token, claims, and signing algorithm models.

// crates.io
use jsonwebtoken::Algorithm;
// self
use crate::{
	_prelude::*,
	auth::{PrincipalId, TokenSecret},
};

/// HMAC-SHA2 algorithms accepted for token signatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningAlgorithm {
	/// HMAC with SHA-256.
	#[default]
	#[serde(rename = "HS256")]
	Hs256,
	/// HMAC with SHA-384.
	#[serde(rename = "HS384")]
	Hs384,
	/// HMAC with SHA-512.
	#[serde(rename = "HS512")]
	Hs512,
}
impl SigningAlgorithm {
	/// Returns the JOSE algorithm name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Hs256 => "HS256",
			Self::Hs384 => "HS384",
			Self::Hs512 => "HS512",
		}
	}

	/// Minimum key length in bytes (the digest size).
	pub const fn min_key_len(self) -> usize {
		match self {
			Self::Hs256 => 32,
			Self::Hs384 => 48,
			Self::Hs512 => 64,
		}
	}

	pub(crate) const fn jwt(self) -> Algorithm {
		match self {
			Self::Hs256 => Algorithm::HS256,
			Self::Hs384 => Algorithm::HS384,
			Self::Hs512 => Algorithm::HS512,
		}
	}
}
impl Display for SigningAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Verified token contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Authenticated principal.
	#[serde(rename = "sub")]
	pub subject: PrincipalId,
	/// Issuer name.
	#[serde(rename = "iss")]
	pub issuer: String,
	/// Intended audience.
	#[serde(rename = "aud")]
	pub audience: String,
	/// Issuance instant (whole seconds).
	#[serde(rename = "iat", with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
	/// Expiry instant (whole seconds).
	#[serde(rename = "exp", with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Random token identifier.
	#[serde(rename = "jti")]
	pub id: String,
}
impl Claims {
	/// Remaining validity at `instant`, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}

	/// Returns `true` once `instant` is strictly past the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant > self.expires_at
	}
}

/// Signed, time-bounded assertion of a principal's identity.
///
/// Tokens are immutable; the only way to obtain one is through
/// [`TokenIssuer::issue`](crate::issuer::TokenIssuer::issue).
#[derive(Clone)]
pub struct Token {
	claims: Claims,
	encoded: TokenSecret,
}
impl Token {
	pub(crate) fn new(claims: Claims, encoded: String) -> Self {
		Self { claims, encoded: TokenSecret::new(encoded) }
	}

	/// Subject principal.
	pub fn subject(&self) -> &PrincipalId {
		&self.claims.subject
	}

	/// Issuer name.
	pub fn issuer(&self) -> &str {
		&self.claims.issuer
	}

	/// Intended audience.
	pub fn audience(&self) -> &str {
		&self.claims.audience
	}

	/// Issuance instant.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.claims.issued_at
	}

	/// Expiry instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.claims.expires_at
	}

	/// Configured lifetime this token was minted with.
	pub fn lifetime(&self) -> Duration {
		self.claims.expires_at - self.claims.issued_at
	}

	/// Full claim set.
	pub fn claims(&self) -> &Claims {
		&self.claims
	}

	/// Compact serialization (`header.payload.signature`). Never log it.
	pub fn encoded(&self) -> &TokenSecret {
		&self.encoded
	}

	/// Base64url signature segment.
	pub fn signature(&self) -> &str {
		self.encoded.expose().rsplit('.').next().unwrap_or_default()
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("claims", &self.claims)
			.field("encoded", &"<redacted>")
			.finish()
	}
}
