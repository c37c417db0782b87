mod common;

// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use authgate::{
	Error,
	auth::TokenSecret,
	error::ConfigError,
	issuer::TokenIssuer,
	secret::{SecretError, SecretSource, VaultSecretSource},
};
use common::*;

const SECRET_PATH: &str = "/v1/secret/data/authgate";

fn source(server: &MockServer) -> VaultSecretSource {
	let address = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	VaultSecretSource::new(&address, "secret", "authgate", TokenSecret::new("s.vault-token"))
		.expect("Vault source should build.")
}

fn kv_body(data: serde_json::Value) -> String {
	serde_json::json!({
		"request_id": "3f0a",
		"lease_duration": 0,
		"data": { "data": data, "metadata": { "version": 3 } },
	})
	.to_string()
}

#[tokio::test]
async fn fields_are_read_from_the_kv_v2_envelope() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH).header("x-vault-token", "s.vault-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(kv_body(serde_json::json!({ KEY_NAME: KEY_B64, "unused": null })));
		})
		.await;
	let source = source(&server);

	assert_eq!(
		source.fetch(KEY_NAME).await.expect("Fetch should succeed."),
		Some(KEY_B64.to_owned())
	);
	assert_eq!(source.fetch("unused").await.expect("Fetch should succeed."), None);
	assert_eq!(source.fetch("absent").await.expect("Fetch should succeed."), None);

	mock.assert_calls_async(3).await;
}

#[tokio::test]
async fn missing_secrets_are_none() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(404).body("{\"errors\":[]}");
		})
		.await;

	assert_eq!(source(&server).fetch(KEY_NAME).await.expect("404 should map to None."), None);

	mock.assert_async().await;
}

#[tokio::test]
async fn server_errors_are_unavailable() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(503).body("{\"errors\":[\"Vault is sealed\"]}");
		})
		.await;

	let err = source(&server).fetch(KEY_NAME).await.expect_err("503 should fail.");

	assert_eq!(err, SecretError::Unavailable { message: "Vault answered with status 503".into() });
}

#[tokio::test]
async fn malformed_payloads_report_their_path() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(200).body(kv_body(serde_json::json!({ KEY_NAME: 42 })));
		})
		.await;

	let err = source(&server).fetch(KEY_NAME).await.expect_err("Numbers are not secrets.");

	assert_eq!(err, SecretError::Malformed { path: format!("data.data.{KEY_NAME}") });

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(200).body("{\"data\":\"sealed\"}");
		})
		.await;

	let err = source(&server).fetch(KEY_NAME).await.expect_err("Envelope shape is enforced.");

	assert_eq!(err, SecretError::Malformed { path: "data".into() });
}

#[tokio::test]
async fn issuer_loads_its_key_from_vault() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(200).body(kv_body(serde_json::json!({ KEY_NAME: KEY_B64 })));
		})
		.await;

	let issuer = TokenIssuer::load(issuer_config(), &source(&server))
		.await
		.expect("Issuer should load from Vault.");
	let alice = authgate::auth::PrincipalId::new("alice").expect("Fixture principal should be valid.");
	let token = issuer.issue(&alice).expect("Issuance should succeed.");

	assert!(issuer.validate(token.encoded().expose()).is_ok());
}

#[tokio::test]
async fn vault_outages_are_configuration_errors_for_the_issuer() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(SECRET_PATH);
			then.status(500);
		})
		.await;

	let err = TokenIssuer::load(issuer_config(), &source(&server))
		.await
		.expect_err("Vault outages should fail startup.");

	assert!(matches!(err, Error::Config(ConfigError::SecretSource(SecretError::Unavailable { .. }))));
}
