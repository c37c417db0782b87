//! HashiCorp Vault KV v2 secret source.
//!
//! Issues `GET {address}/v1/{mount}/data/{path}` with the `X-Vault-Token` header and reads the
//! requested name from the `data.data` map of the response envelope.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::{Client as ReqwestClient, StatusCode};
use url::Url;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	obs,
	secret::{SecretError, SecretFuture, SecretSource},
};

const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(5);

#[derive(Debug, Deserialize)]
struct KvEnvelope {
	data: KvData,
}

#[derive(Debug, Deserialize)]
struct KvData {
	#[serde(default)]
	data: HashMap<String, serde_json::Value>,
}

/// Vault KV v2 client that resolves names as fields of a single secret.
#[derive(Clone)]
pub struct VaultSecretSource {
	client: ReqwestClient,
	endpoint: String,
	token: TokenSecret,
}
impl VaultSecretSource {
	/// Builds a source with a default client (5 second timeout).
	pub fn new(
		address: &Url,
		mount: &str,
		path: &str,
		token: TokenSecret,
	) -> Result<Self, SecretError> {
		let client = ReqwestClient::builder().timeout(DEFAULT_TIMEOUT).build().map_err(|e| {
			SecretError::Unavailable { message: obs::redact(&e.to_string()) }
		})?;

		Ok(Self::with_client(client, address, mount, path, token))
	}

	/// Builds a source around a caller-provided reqwest client.
	pub fn with_client(
		client: ReqwestClient,
		address: &Url,
		mount: &str,
		path: &str,
		token: TokenSecret,
	) -> Self {
		let endpoint = format!(
			"{}/v1/{}/data/{}",
			address.as_str().trim_end_matches('/'),
			mount.trim_matches('/'),
			path.trim_matches('/')
		);

		Self { client, endpoint, token }
	}

	async fn fetch_now(&self, name: &str) -> Result<Option<String>, SecretError> {
		let response = self
			.client
			.get(&self.endpoint)
			.header("X-Vault-Token", self.token.expose())
			.send()
			.await
			.map_err(|e| SecretError::Unavailable { message: obs::redact(&e.to_string()) })?;
		let status = response.status();

		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			return Err(SecretError::Unavailable {
				message: format!("Vault answered with status {}", status.as_u16()),
			});
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| SecretError::Unavailable { message: obs::redact(&e.to_string()) })?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let envelope: KvEnvelope = serde_path_to_error::deserialize(de)
			.map_err(|e| SecretError::Malformed { path: e.path().to_string() })?;

		match envelope.data.data.get(name) {
			None | Some(serde_json::Value::Null) => Ok(None),
			Some(serde_json::Value::String(value)) => Ok(Some(value.to_owned())),
			Some(_) => Err(SecretError::Malformed { path: format!("data.data.{name}") }),
		}
	}
}
impl SecretSource for VaultSecretSource {
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a> {
		Box::pin(self.fetch_now(name))
	}
}
impl Debug for VaultSecretSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("VaultSecretSource")
			.field("endpoint", &self.endpoint)
			.field("token", &self.token)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoint_normalizes_slashes() {
		let address = Url::parse("https://vault.internal:8200/").expect("Fixture URL should parse.");
		let source = VaultSecretSource::new(&address, "/secret/", "/authgate/", TokenSecret::new("t"))
			.expect("Default client should build.");

		assert_eq!(source.endpoint, "https://vault.internal:8200/v1/secret/data/authgate");
		assert!(!format!("{source:?}").contains("\"t\""));
	}
}
