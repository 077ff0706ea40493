//! Form-builder core: document model, editing commands, and JSON wire
//! helpers.
//!
//! This crate is responsible for the dashboard's dynamic form definitions: the
//! strict JSON wire model of a form document, and the pure transition function
//! that editing sessions replay over it.
//!
//! Report projection lives in `careboard-report`. This crate handles document
//! structure and editing semantics only.

pub mod document;
pub mod element;
pub mod reducer;

use thiserror::Error;

pub use document::{document_from_json, document_to_json, FormDocument};
pub use element::{FormElement, FormElementKind};
pub use reducer::{apply, apply_with, command_from_json, Command, ElementPatch};

/// Errors returned by the `careboard-forms` crate.
#[derive(Debug, Error)]
pub enum FormsError {
    /// JSON serialisation failed.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Two elements in a document share an id.
    #[error("duplicate element id '{0}' in form document")]
    DuplicateElementId(String),

    /// An element's options field disagrees with its type.
    #[error("element '{0}' has an options field that does not match its type")]
    OptionsMismatch(String),

    /// An element type string outside the supported set.
    #[error("unknown element type: '{0}'")]
    UnknownElementKind(String),

    /// Schema-mismatch and other translation failures.
    #[error("translation error: {0}")]
    Translation(String),
}

/// Result type for form-builder operations.
pub type FormsResult<T> = Result<T, FormsError>;

/// Builds the translation error for a wire parse failure, surfacing the
/// best-effort path (for example `elements[2].type`) to the failing field.
pub(crate) fn schema_mismatch(
    what: &str,
    err: serde_path_to_error::Error<serde_json::Error>,
) -> FormsError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() {
        "<root>".to_string()
    } else {
        path
    };
    FormsError::Translation(format!("{what} schema mismatch at {path}: {source}"))
}
