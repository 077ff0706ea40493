//! Report projection and validation.
//!
//! This crate turns a form definition plus the values captured while filling
//! it into ordered report content, and enforces the rules that decide whether
//! a report can leave draft: required elements must carry usable values and
//! the report must be tagged with the resident it is about.
//!
//! Validation never repairs input. A value that does not fit its element, or
//! that references an element the form does not define, is reported as an
//! error and the report is not produced.

pub mod content;
pub mod incident;
pub mod medication;
pub mod section;

use thiserror::Error;

pub use content::{report_content, values_from_json, CapturedValues};
pub use incident::{report_to_json, IncidentReport, ReportStatus, ReportTags};
pub use medication::{medication_from_json, MedicationRecord};
pub use section::{CapturedValue, ReportSection};

/// Errors returned by the `careboard-report` crate.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required element has no usable value.
    #[error("required element '{element_id}' ({label}) is missing a value")]
    RequiredValueMissing { element_id: String, label: String },

    /// A captured value's shape does not fit the element's type.
    #[error("element '{element_id}' of type '{kind}' cannot take a {given} value")]
    ShapeMismatch {
        element_id: String,
        kind: String,
        given: &'static str,
    },

    /// A captured value references an element the form does not define.
    #[error("captured value references unknown element '{0}'")]
    UnknownElement(String),

    /// A tag required for publication is missing or blank.
    #[error("cannot publish: {0}")]
    MissingTag(String),

    /// Date fields are ordered impossibly.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// JSON serialisation failed.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Schema-mismatch and other translation failures.
    #[error("translation error: {0}")]
    Translation(String),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Builds the translation error for a wire parse failure, surfacing the
/// best-effort path to the failing field.
pub(crate) fn schema_mismatch(
    what: &str,
    err: serde_path_to_error::Error<serde_json::Error>,
) -> ReportError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() {
        "<root>".to_string()
    } else {
        path
    };
    ReportError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
