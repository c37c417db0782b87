//! Redacted wrappers that keep proofs, tokens, and signing material out of logs.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

macro_rules! def_redacted {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone)]
		pub struct $name(String);
		impl $name {
			/// Wraps a new secret string.
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}

			/// Returns `true` when the wrapped value is empty.
			pub fn is_empty(&self) -> bool {
				self.0.is_empty()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_redacted! { Proof, "Proof presented by a principal (typically a password)." }
def_redacted! { TokenSecret, "Encoded bearer token; anyone holding it can act as the subject." }

/// Raw signing key bytes resolved from a secret source.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);
impl SigningSecret {
	/// Wraps already-decoded key bytes.
	pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// Decodes standard base64 key material, tolerating surrounding whitespace.
	pub fn from_base64(value: &str) -> Option<Self> {
		STANDARD.decode(value.trim()).ok().map(Self)
	}

	/// Returns the key bytes. Callers must never log them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}

	/// Key length in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no key bytes are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Debug for SigningSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SigningSecret").field("len", &self.0.len()).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let proof = Proof::new("hunter2");
		let token = TokenSecret::new("eyJhbGciOi.payload.signature");

		assert_eq!(format!("{proof:?}"), "Proof(\"<redacted>\")");
		assert_eq!(format!("{proof}"), "<redacted>");
		assert_eq!(format!("{token:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(proof.expose(), "hunter2");
	}

	#[test]
	fn secret_wrappers_do_not_implement_equality() {
		// Resolves only when `T: PartialEq` does not hold; otherwise the call is ambiguous.
		trait AmbiguousIfEq<A> {
			fn check() {}
		}
		impl<T: ?Sized> AmbiguousIfEq<()> for T {}
		impl<T: ?Sized + PartialEq> AmbiguousIfEq<u8> for T {}

		<Proof as AmbiguousIfEq<_>>::check();
		<TokenSecret as AmbiguousIfEq<_>>::check();
		<SigningSecret as AmbiguousIfEq<_>>::check();
	}

	#[test]
	fn signing_secret_decodes_base64_and_hides_bytes() {
		let secret = SigningSecret::from_base64(" AAECAw== \n")
			.expect("Padded base64 with whitespace should decode.");

		assert_eq!(secret.expose(), &[0, 1, 2, 3]);
		assert_eq!(format!("{secret:?}"), "SigningSecret { len: 4, .. }");
		assert!(SigningSecret::from_base64("not base64!").is_none());
	}
}
