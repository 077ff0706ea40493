//! # Careboard Store
//!
//! File-backed persistence for form documents:
//! - Form creation and listing with sharded JSON storage
//! - File system operations under the configured data directory
//!
//! Each form lives in its own directory, sharded by the first four characters
//! of its canonical id:
//!
//! `<data_dir>/forms/<s1>/<s2>/<form_id>/form.json`
//!
//! Sharding keeps directory fan-out bounded as the number of stored forms
//! grows.

pub mod config;
pub mod constants;

pub use config::{data_dir_from_env_value, StoreConfig};

use crate::constants::FORM_JSON_FILENAME;
use careboard_forms::{document_from_json, document_to_json, FormDocument};
use careboard_id::FormId;
use std::fs;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create form directory: {0}")]
    FormDirCreation(std::io::Error),
    #[error("failed to write form file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read form file: {0}")]
    FileRead(std::io::Error),
    #[error("no stored form with id {0}")]
    FormNotFound(String),
    #[error("form error: {0}")]
    Forms(#[from] careboard_forms::FormsError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Summary row for a stored form, as returned by [`FormStore::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormListing {
    pub form_id: FormId,
    pub title: String,
    pub element_count: usize,
}

/// Service for managing stored form documents.
#[derive(Clone, Debug)]
pub struct FormStore {
    cfg: StoreConfig,
}

impl FormStore {
    pub fn new(cfg: StoreConfig) -> Self {
        Self { cfg }
    }

    /// Persists a new form document under a freshly allocated id.
    ///
    /// # Returns
    ///
    /// Returns the id the document was stored under (canonical form: 32
    /// lowercase hex characters, no hyphens).
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if:
    /// - the document violates a structural invariant,
    /// - a unique form directory cannot be allocated after 5 id attempts,
    /// - writing `form.json` fails.
    pub fn create(&self, document: &FormDocument) -> StoreResult<FormId> {
        self.create_with(document, FormId::generate)
    }

    /// Persists a new form document, drawing candidate ids from `id_source`.
    ///
    /// Behaves like [`FormStore::create`] but with an injectable id source so
    /// callers can control allocation.
    pub fn create_with(
        &self,
        document: &FormDocument,
        id_source: impl FnMut() -> FormId,
    ) -> StoreResult<FormId> {
        document.validate()?;

        let forms_dir = self.cfg.forms_dir();
        fs::create_dir_all(&forms_dir).map_err(StoreError::StorageDirCreation)?;

        let (form_id, form_dir) = allocate_unique_form_dir(&forms_dir, id_source)?;

        let json = document_to_json(document)?;
        if let Err(write_error) = fs::write(form_dir.join(FORM_JSON_FILENAME), json) {
            // On error, attempt to clean up the partially-created form directory.
            if let Err(cleanup_error) = fs::remove_dir_all(&form_dir) {
                tracing::warn!(
                    "failed to clean up form directory {}: {}",
                    form_dir.display(),
                    cleanup_error
                );
            }
            return Err(StoreError::FileWrite(write_error));
        }

        Ok(form_id)
    }

    /// Overwrites the stored document for an existing form.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if:
    /// - the document violates a structural invariant,
    /// - no form with this id has been created,
    /// - writing `form.json` fails.
    pub fn save(&self, form_id: &FormId, document: &FormDocument) -> StoreResult<()> {
        document.validate()?;

        let form_dir = self.form_dir(form_id);
        if !form_dir.is_dir() {
            return Err(StoreError::FormNotFound(form_id.to_string()));
        }

        let json = document_to_json(document)?;
        fs::write(form_dir.join(FORM_JSON_FILENAME), json).map_err(StoreError::FileWrite)?;

        Ok(())
    }

    /// Loads the stored document for a form.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if:
    /// - no form with this id has been created,
    /// - reading `form.json` fails,
    /// - the stored JSON no longer parses as a valid form document.
    pub fn load(&self, form_id: &FormId) -> StoreResult<FormDocument> {
        let form_file = self.form_file(form_id);

        let contents = match fs::read_to_string(&form_file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::FormNotFound(form_id.to_string()))
            }
            Err(e) => return Err(StoreError::FileRead(e)),
        };

        Ok(document_from_json(&contents)?)
    }

    /// Lists all stored forms, sorted by form id.
    ///
    /// This method traverses the sharded directory structure under the forms
    /// directory and reads every `form.json` it finds. If any individual form
    /// file cannot be parsed, it will be logged as a warning and skipped.
    /// Directories whose names are not canonical form ids are ignored.
    pub fn list(&self) -> Vec<FormListing> {
        let forms_dir = self.cfg.forms_dir();

        let mut listings = Vec::new();

        let s1_iter = match fs::read_dir(&forms_dir) {
            Ok(it) => it,
            Err(_) => return listings,
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    if !id_path.is_dir() {
                        continue;
                    }

                    let Some(form_id) = id_path
                        .file_name()
                        .and_then(|os| os.to_str())
                        .and_then(|name| FormId::parse(name).ok())
                    else {
                        continue;
                    };

                    let form_file = id_path.join(FORM_JSON_FILENAME);
                    if !form_file.is_file() {
                        continue;
                    }

                    if let Ok(contents) = fs::read_to_string(&form_file) {
                        match document_from_json(&contents) {
                            Ok(document) => listings.push(FormListing {
                                form_id,
                                title: document.title,
                                element_count: document.elements.len(),
                            }),
                            Err(_) => {
                                tracing::warn!(
                                    "failed to parse stored form: {}",
                                    form_file.display()
                                );
                            }
                        }
                    }
                }
            }
        }

        listings.sort_by(|a, b| a.form_id.cmp(&b.form_id));
        listings
    }

    fn form_dir(&self, form_id: &FormId) -> PathBuf {
        form_id.sharded_dir(&self.cfg.forms_dir())
    }

    fn form_file(&self, form_id: &FormId) -> PathBuf {
        self.form_dir(form_id).join(FORM_JSON_FILENAME)
    }
}

fn allocate_unique_form_dir(
    forms_dir: &Path,
    mut id_source: impl FnMut() -> FormId,
) -> StoreResult<(FormId, PathBuf)> {
    // Allocate a new id, but guard against pathological id collisions (or
    // pre-existing directories from external interference) by limiting retries.
    for _attempt in 0..5 {
        let form_id = id_source();
        let candidate = form_id.sharded_dir(forms_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(StoreError::FormDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((form_id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StoreError::FormDirCreation(e)),
        }
    }

    Err(StoreError::FormDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to allocate a unique form directory after 5 attempts",
    )))
}
