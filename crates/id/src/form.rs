//! Identifiers for persisted form documents, including storage path
//! derivation.

use crate::{IdError, IdResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical identifier of a persisted form document.
///
/// The store addresses every saved document by `FormId` and derives the
/// document's on-disk location from it. Once constructed, the wrapper
/// guarantees the identifier is in canonical form (32 lowercase hex
/// characters, no hyphens), so path derivation is consistent across the
/// system.
///
/// # Construction
/// - [`FormId::generate`] allocates a fresh identifier when a document is
///   first created.
/// - [`FormId::parse`] validates an externally supplied identifier (for
///   example, a CLI argument).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(Uuid);

impl FormId {
    /// Generates a fresh document identifier in canonical form.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// Other common UUID forms (hyphenated, uppercase) are **not** normalised.
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
            "Form id must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical identifier form.
    pub fn is_canonical(input: &str) -> bool {
        crate::is_canonical_hex(input)
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are derived from
    /// this identifier.
    ///
    /// - `s1` is the first two hex characters of the identifier
    /// - `s2` is the next two hex characters
    /// - The full identifier forms the leaf directory
    ///
    /// # Arguments
    ///
    /// * `parent_dir` - Base directory under which to shard the identifier.
    ///
    /// # Returns
    ///
    /// Returns the fully qualified sharded directory path for this
    /// identifier.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for FormId {
    type Err = IdError;

    /// Equivalent to calling [`FormId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FormId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FormId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FormId::parse(&s).map_err(serde::de::Error::custom)
    }
}
