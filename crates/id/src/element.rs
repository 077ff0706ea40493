//! Identifiers for the fields of a form document.

use crate::{IdError, IdResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical identifier of a single element within a form document.
///
/// A form document addresses its fields by `ElementId`: commands that update
/// or remove an element name one, and captured report values are keyed by one.
/// Once constructed, the wrapper guarantees the identifier is in canonical
/// form (32 lowercase hex characters, no hyphens), so equality checks and
/// lookups never depend on formatting.
///
/// # Construction
/// - [`ElementId::generate`] allocates a fresh identifier for a new element.
/// - [`ElementId::parse`] validates an externally supplied identifier.
///
/// # Display format
/// When displayed or converted to a string, `ElementId` always produces the
/// canonical 32-character lowercase hex form without hyphens.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generates a fresh element identifier in canonical form.
    ///
    /// Suitable for allocating an identifier when a new element is added to a
    /// document. The value follows RFC 4122 version 4.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Other common UUID forms (hyphenated, uppercase) are **not** normalised.
    /// Callers must provide the canonical representation.
    ///
    /// # Arguments
    ///
    /// * `input` - Identifier string to validate and wrap. Must be exactly 32
    ///   lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> IdResult<Self> {
        if Self::is_canonical(input) {
            // is_canonical guarantees valid hex, so parse_str will succeed
            let uuid = Uuid::parse_str(input).expect("is_canonical guarantees a valid UUID");
            return Ok(Self(uuid));
        }
        Err(IdError::InvalidInput(format!(
            "Element id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical identifier form.
    ///
    /// Purely syntactic; can be used for pre-validation before calling
    /// [`ElementId::parse`].
    pub fn is_canonical(input: &str) -> bool {
        crate::is_canonical_hex(input)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ElementId {
    type Err = IdError;

    /// Equivalent to calling [`ElementId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ElementId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ElementId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ElementId::parse(&s).map_err(serde::de::Error::custom)
    }
}
