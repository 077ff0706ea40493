//! Medical record shapes and legacy-record classification.
//!
//! A resident's history arrives from two directions. Current tooling writes
//! records with an explicit `record_type` marker, which deserialise straight
//! into the [`MedicalRecord`] tagged union. Older exports wrote a flat bag of
//! optional fields with no marker at all; those parse tolerantly into a
//! [`LegacyRecord`] and are classified into the same union by which
//! discriminating field is present.
//!
//! Everything downstream of ingestion works with [`MedicalRecord`] only.
//! There is exactly one place where "which kind of record is this?" gets
//! answered, and a record that answers nothing is an error, not a guess.

pub mod legacy;
pub mod record;

use thiserror::Error;

pub use legacy::{classify, classify_json, LegacyRecord};
pub use record::{MedicalRecord, RecordSummary};

/// Errors returned by the `careboard-records` crate.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A legacy record matches none of the known shapes.
    #[error(
        "record matches no known shape: none of condition_name, allergen, illness_name, procedure or vaccine is present"
    )]
    UnknownShape,

    /// Schema-mismatch and other translation failures.
    #[error("translation error: {0}")]
    Translation(String),
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Builds the translation error for a wire parse failure, surfacing the
/// best-effort path to the failing field.
pub(crate) fn schema_mismatch(
    what: &str,
    err: serde_path_to_error::Error<serde_json::Error>,
) -> RecordError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() {
        "<root>".to_string()
    } else {
        path
    };
    RecordError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
