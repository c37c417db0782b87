//! Principal identifiers, redacted secret wrappers, password digests, and credential records.

pub mod credential;
pub mod id;
pub mod password;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use password::*;
pub use secret::*;
