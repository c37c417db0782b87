//! Credential verification and signed-token issuance behind a small, auditable service
//! boundary: principals present a proof, the verifier checks it against a salted one-way hash,
//! and the issuer mints a short-lived JWT signed with key material fetched at startup.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod issuer;
pub mod obs;
pub mod secret;
#[cfg(feature = "server")] pub mod server;
pub mod store;
pub mod verifier;


mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

pub use error::{Error, Result};
#[cfg(feature = "cli")] use {color_eyre as _, tracing_subscriber as _};
#[cfg(test)] use {http_body_util as _, httpmock as _, tower as _};
