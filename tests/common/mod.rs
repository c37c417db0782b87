//! Fixtures shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use time::OffsetDateTime;
// self
use authgate::{
	audit::MemoryAuditSink,
	auth::{CredentialHasher, CredentialRecord, PrincipalId},
	config::IssuerConfig,
	issuer::TokenIssuer,
	secret::StaticSecretSource,
	store::{CredentialStore, MemoryCredentialStore},
	verifier::CredentialVerifier,
};

pub const KEY_NAME: &str = "AUTHGATE_SIGNING_KEY";
/// Base64 of 32 bytes `0x2a`.
pub const KEY_B64: &str = "KioqKioqKioqKioqKioqKioqKioqKioqKioqKioqKio=";
pub const ALICE_PROOF: &str = "correct horse battery staple";

pub fn hasher() -> CredentialHasher {
	CredentialHasher::with_params(4096, 1, 1).expect("Test hashing parameters should be valid.")
}

pub fn issuer_config() -> IssuerConfig {
	IssuerConfig::new("authgate.it", "authgate-it-users", KEY_NAME)
}

pub async fn issuer() -> Arc<TokenIssuer> {
	let source = StaticSecretSource::default().with_secret(KEY_NAME, KEY_B64);
	let issuer = TokenIssuer::load(issuer_config(), &source)
		.await
		.expect("Issuer should load from the static secret source.");

	Arc::new(issuer)
}

/// Store seeded with `alice`, as the external registration service would leave it.
pub fn seeded_store() -> Arc<MemoryCredentialStore> {
	let store = Arc::new(MemoryCredentialStore::default());
	let alice = PrincipalId::new("alice").expect("Fixture principal should be valid.");
	let digest = hasher().hash(ALICE_PROOF).expect("Fixture proof should hash.");

	store.insert(CredentialRecord::new(alice, digest, OffsetDateTime::now_utc()));

	store
}

pub async fn verifier_with(
	store: Arc<dyn CredentialStore>,
) -> (Arc<CredentialVerifier>, Arc<MemoryAuditSink>) {
	verifier_with_hasher(store, hasher()).await
}

pub async fn verifier_with_hasher(
	store: Arc<dyn CredentialStore>,
	hasher: CredentialHasher,
) -> (Arc<CredentialVerifier>, Arc<MemoryAuditSink>) {
	let audit = Arc::new(MemoryAuditSink::default());
	let verifier = CredentialVerifier::new(store, issuer().await, audit.clone(), hasher)
		.expect("Verifier should build.");

	(Arc::new(verifier), audit)
}
