//! Canonical identifiers and sharded-path utilities.
//!
//! The dashboard stores form documents under sharded directories derived from
//! the document's identifier, and addresses individual form fields through an
//! element identifier carried inside the document itself.
//!
//! To keep path derivation and captured-value lookups deterministic, both
//! identifier families use a *canonical* representation: **32 lowercase
//! hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`FormId`] for persisted form documents, including the sharding logic
//!   that derives a document's storage directory.
//! - [`ElementId`] for the fields of a form document.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Notes:
//! - This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! - Canonical form is *required* for externally supplied identifiers (for
//!   example, CLI arguments or captured report values). Use [`FormId::parse`]
//!   or [`ElementId::parse`] to validate an input string.
//! - Non-canonical values (uppercase, hyphenated, wrong length, non-hex) are
//!   rejected.
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, a document lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `careboard_data/forms/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! This scheme prevents very large fan-out in a single directory.

mod element;
mod form;

pub use element::ElementId;
pub use form::FormId;

/// Re-exported for convenience.
pub use uuid::Uuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

/// Syntactic check shared by both identifier families: exactly 32 bytes,
/// lowercase hex characters only.
pub(crate) fn is_canonical_hex(input: &str) -> bool {
    input.len() == 32
        && input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
