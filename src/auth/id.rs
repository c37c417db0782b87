//! Strongly typed principal identifiers.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Principal identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Principal identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed byte count.
	#[error("Principal identifier exceeds {max} bytes.")]
	TooLong {
		/// Maximum permitted length.
		max: usize,
	},
}

/// Unique identifier for an authenticating principal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);
impl PrincipalId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for PrincipalId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for PrincipalId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<PrincipalId> for String {
	fn from(value: PrincipalId) -> Self {
		value.0
	}
}
impl TryFrom<String> for PrincipalId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for PrincipalId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for PrincipalId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Principal({})", self.0)
	}
}
impl Display for PrincipalId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for PrincipalId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert_eq!(PrincipalId::new(""), Err(IdentifierError::Empty));
		assert_eq!(PrincipalId::new(" alice"), Err(IdentifierError::ContainsWhitespace));
		assert_eq!(PrincipalId::new("alice "), Err(IdentifierError::ContainsWhitespace));

		let alice = PrincipalId::new("alice").expect("Plain identifiers should be accepted.");

		assert_eq!(alice.as_ref(), "alice");
		assert_eq!(format!("{alice:?}"), "Principal(alice)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let principal: PrincipalId =
			serde_json::from_str("\"bob\"").expect("Principal should deserialize successfully.");

		assert_eq!(principal.as_ref(), "bob");
		assert!(serde_json::from_str::<PrincipalId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<PrincipalId>("\"\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("alice{}smith", '\u{00A0}');

		assert!(PrincipalId::new(&nbsp).is_err());

		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		PrincipalId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert_eq!(PrincipalId::new(&too_long), Err(IdentifierError::TooLong { max: 128 }));
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<PrincipalId, u8> = HashMap::from_iter([(
			PrincipalId::new("alice").expect("Principal used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("alice"), Some(&7));
	}
}
