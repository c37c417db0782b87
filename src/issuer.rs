//! Token issuer: mints and validates HMAC-signed JWTs for authenticated principals.
//!
//! Signing material is resolved once through a [`SecretSource`] when the issuer is loaded and
//! then held in memory for the issuer's lifetime. Issuance never touches the network.

pub mod token;

pub use token::*;

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{PrincipalId, SigningSecret},
	config::IssuerConfig,
	error::ConfigError,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	secret::SecretSource,
};

const TOKEN_ID_LEN: usize = 16;
const KEY_ID_LEN: usize = 8;

/// Mints signed tokens for verified principals and checks tokens it minted.
///
/// Construction fails fast with [`ConfigError`] when signing material is missing or weak, so a
/// running issuer always has a usable key.
#[derive(Clone)]
pub struct TokenIssuer {
	issuer: String,
	audience: String,
	lifetime: Duration,
	algorithm: SigningAlgorithm,
	key_id: String,
	encoding: EncodingKey,
	decoding: DecodingKey,
}
impl TokenIssuer {
	/// Resolves the configured signing key through `source` and builds the issuer.
	///
	/// The secret value must be standard base64; its decoded length must reach the algorithm's
	/// digest size.
	pub async fn load(config: IssuerConfig, source: &dyn SecretSource) -> Result<Self> {
		config.validate()?;

		let name = config.signing_key.clone();
		let raw = source
			.fetch(&name)
			.await
			.map_err(ConfigError::from)?
			.ok_or_else(|| ConfigError::MissingSigningKey { name: name.clone() })?;
		let secret =
			SigningSecret::from_base64(&raw).ok_or(ConfigError::SigningKeyEncoding { name })?;

		Ok(Self::from_secret(config, &secret)?)
	}

	/// Builds the issuer from already-resolved key bytes.
	pub fn from_secret(config: IssuerConfig, secret: &SigningSecret) -> Result<Self, ConfigError> {
		config.validate()?;

		let min = config.algorithm.min_key_len();

		if secret.len() < min {
			return Err(ConfigError::WeakSigningKey { min, actual: secret.len() });
		}

		let lifetime = config.lifetime();
		let IssuerConfig { issuer, audience, algorithm, .. } = config;

		Ok(Self {
			issuer,
			audience,
			lifetime,
			algorithm,
			key_id: key_id(secret.expose()),
			encoding: EncodingKey::from_secret(secret.expose()),
			decoding: DecodingKey::from_secret(secret.expose()),
		})
	}

	/// Issuer name stamped into `iss`.
	pub fn issuer(&self) -> &str {
		&self.issuer
	}

	/// Audience stamped into `aud`.
	pub fn audience(&self) -> &str {
		&self.audience
	}

	/// Lifetime of every minted token.
	pub fn lifetime(&self) -> Duration {
		self.lifetime
	}

	/// Signing algorithm.
	pub fn algorithm(&self) -> SigningAlgorithm {
		self.algorithm
	}

	/// Key identifier published in the `kid` header; derived from the key, not secret.
	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	/// Mints a token for `subject` using the current UTC clock.
	pub fn issue(&self, subject: &PrincipalId) -> Result<Token> {
		self.issue_at(subject, OffsetDateTime::now_utc())
	}

	/// Mints a token for `subject` as of `now`.
	///
	/// `now` is truncated to whole seconds so the returned token matches what validation decodes.
	pub fn issue_at(&self, subject: &PrincipalId, now: OffsetDateTime) -> Result<Token> {
		let span = OperationSpan::new(OperationKind::Issue, "issue_at");
		let _guard = span.clone().entered();

		obs::record_outcome(OperationKind::Issue, OperationOutcome::Attempt);

		let result = self.sign(subject, now);

		obs::finish(&span, OperationKind::Issue, result.as_ref().err().map(Error::code));

		result
	}

	/// Validates a compact token against the current UTC clock.
	pub fn validate(&self, token: &str) -> Result<Claims> {
		self.validate_at(token, OffsetDateTime::now_utc())
	}

	/// Validates a compact token as of `now`.
	///
	/// Checks run in order: signature, then issuer and audience, then expiry. A token is still
	/// valid at its exact expiry instant.
	pub fn validate_at(&self, token: &str, now: OffsetDateTime) -> Result<Claims> {
		let span = OperationSpan::new(OperationKind::Validate, "validate_at");
		let _guard = span.clone().entered();

		obs::record_outcome(OperationKind::Validate, OperationOutcome::Attempt);

		let result = self.decode(token, now);

		obs::finish(&span, OperationKind::Validate, result.as_ref().err().map(Error::code));

		result
	}

	fn sign(&self, subject: &PrincipalId, now: OffsetDateTime) -> Result<Token> {
		let issued_at = now.replace_nanosecond(0).unwrap_or(now);
		let claims = Claims {
			subject: subject.clone(),
			issuer: self.issuer.clone(),
			audience: self.audience.clone(),
			issued_at,
			expires_at: issued_at + self.lifetime,
			id: URL_SAFE_NO_PAD.encode(rand::random::<[u8; TOKEN_ID_LEN]>()),
		};
		let mut header = Header::new(self.algorithm.jwt());

		header.kid = Some(self.key_id.clone());

		let encoded = jsonwebtoken::encode(&header, &claims, &self.encoding)
			.map_err(ConfigError::signing)?;

		Ok(Token::new(claims, encoded))
	}

	fn decode(&self, token: &str, now: OffsetDateTime) -> Result<Claims> {
		let mut validation = Validation::new(self.algorithm.jwt());

		// Expiry is checked below against the injected clock.
		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
		validation.set_issuer(&[&self.issuer]);
		validation.set_audience(&[&self.audience]);

		let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
			.map_err(map_jwt_error)?
			.claims;

		if claims.is_expired_at(now) {
			return Err(Error::TokenExpired);
		}

		Ok(claims)
	}
}
impl Debug for TokenIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenIssuer")
			.field("issuer", &self.issuer)
			.field("audience", &self.audience)
			.field("lifetime", &self.lifetime)
			.field("algorithm", &self.algorithm)
			.field("key_id", &self.key_id)
			.finish_non_exhaustive()
	}
}

fn key_id(secret: &[u8]) -> String {
	URL_SAFE_NO_PAD.encode(&Sha256::digest(secret)[..KEY_ID_LEN])
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> Error {
	match e.kind() {
		ErrorKind::InvalidSignature => Error::TokenInvalidSignature,
		ErrorKind::ExpiredSignature => Error::TokenExpired,
		ErrorKind::InvalidIssuer => Error::TokenClaimsMismatch { claim: "iss" },
		ErrorKind::InvalidAudience => Error::TokenClaimsMismatch { claim: "aud" },
		_ => Error::TokenMalformed,
	}
}
