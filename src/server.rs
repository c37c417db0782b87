//! Inbound HTTP surface: `POST /authenticate` and `GET /health`.
//!
//! Error bodies carry only the stable [`Error::code`]-style label, never messages or secrets.

// std
use std::time::Duration as StdDuration;
// crates.io
use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{HeaderValue, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::json;
// self
use crate::{_prelude::*, auth::Proof, issuer::Token, verifier::CredentialVerifier};

const TOKEN_TYPE: &str = "Bearer";
const RETRY_AFTER_SECS: &str = "1";

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
	verifier: Arc<CredentialVerifier>,
	request_timeout: StdDuration,
}
impl AppState {
	/// Bundles the verifier with the per-request verification deadline.
	pub fn new(verifier: Arc<CredentialVerifier>, request_timeout: StdDuration) -> Self {
		Self { verifier, request_timeout }
	}
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/authenticate", post(authenticate))
		.route("/health", get(health))
		.with_state(state)
}

#[derive(Deserialize)]
struct AuthenticateRequest {
	principal_id: String,
	proof: String,
}

#[derive(Serialize)]
struct TokenResponse<'a> {
	token: &'a str,
	token_type: &'static str,
	expires_in: i64,
}
impl<'a> From<&'a Token> for TokenResponse<'a> {
	fn from(token: &'a Token) -> Self {
		Self {
			token: token.encoded().expose(),
			token_type: TOKEN_TYPE,
			expires_in: token.lifetime().whole_seconds(),
		}
	}
}

async fn health() -> impl IntoResponse {
	Json(json!({ "status": "ok" }))
}

async fn authenticate(
	State(state): State<AppState>,
	body: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Response {
	let Ok(Json(AuthenticateRequest { principal_id, proof })) = body else {
		return error_body(StatusCode::BAD_REQUEST, "invalid_request");
	};
	let proof = Proof::new(proof);
	let verification = state.verifier.verify(&principal_id, &proof);

	match tokio::time::timeout(state.request_timeout, verification).await {
		Ok(Ok(token)) => (
			StatusCode::OK,
			[(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
			Json(TokenResponse::from(&token)),
		)
			.into_response(),
		Ok(Err(e)) => error_response(&e),
		Err(_) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(timeout_ms = state.request_timeout.as_millis(), "verification timed out");

			unavailable()
		},
	}
}

fn error_response(e: &Error) -> Response {
	match e {
		Error::InvalidCredentials => error_body(StatusCode::UNAUTHORIZED, e.code()),
		Error::StoreUnavailable(_) => unavailable(),
		_ => {
			#[cfg(feature = "tracing")]
			tracing::error!(error = %crate::obs::redact(&format!("{e:?}")), "authentication failed internally");

			error_body(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
		},
	}
}

fn unavailable() -> Response {
	let mut response = error_body(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable");

	response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));

	response
}

fn error_body(status: StatusCode, code: &'static str) -> Response {
	(status, Json(json!({ "error": code }))).into_response()
}
