//! Path and filename constants for the form store.
//!
//! Kept in one place so the on-disk layout stays consistent across the
//! codebase.

/// Directory name for form document storage.
pub const FORMS_DIR_NAME: &str = "forms";

/// Default directory for careboard data when no explicit directory is
/// configured.
pub const DEFAULT_DATA_DIR: &str = "careboard_data";

/// Filename for form document JSON files.
pub const FORM_JSON_FILENAME: &str = "form.json";
