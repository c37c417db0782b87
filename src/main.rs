//! `authgate` binary: loads configuration, resolves the signing key, opens the credential file,
//! and serves the HTTP surface until Ctrl-C.

// std
use std::{path::PathBuf, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use authgate::{
	audit::TracingAuditSink,
	config::Config,
	issuer::TokenIssuer,
	server::{self, AppState},
	store::FileCredentialStore,
	verifier::CredentialVerifier,
};

const CONFIG_ENV: &str = "AUTHGATE_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let path = std::env::args_os()
		.nth(1)
		.map(PathBuf::from)
		.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
		.ok_or_else(|| eyre!("usage: authgate <config.json> (or set {CONFIG_ENV})"))?;
	let config = Config::load(&path)?;
	let secrets = config.secrets.build()?;
	let issuer = TokenIssuer::load(config.issuer.clone(), secrets.as_ref()).await?;
	let store = FileCredentialStore::open(&config.store.path)?;

	tracing::info!(
		issuer = issuer.issuer(),
		audience = issuer.audience(),
		algorithm = %issuer.algorithm(),
		kid = issuer.key_id(),
		records = store.len(),
		"signing key loaded"
	);

	let verifier = CredentialVerifier::new(
		Arc::new(store),
		Arc::new(issuer),
		Arc::new(TracingAuditSink),
		config.hashing.hasher()?,
	)?;
	let app = server::router(AppState::new(Arc::new(verifier), config.server.request_timeout()));
	let listener = TcpListener::bind(config.server.bind).await?;

	tracing::info!(bind = %listener.local_addr()?, "listening");

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			let _ = tokio::signal::ctrl_c().await;

			tracing::info!("shutting down");
		})
		.await?;

	Ok(())
}
