//! Store configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! store. Nothing here reads process-wide environment variables during an
//! operation; that can lead to inconsistent behaviour in multi-threaded
//! runtimes and test harnesses, so callers read the environment once and pass
//! the values in.

use crate::constants::{DEFAULT_DATA_DIR, FORMS_DIR_NAME};
use crate::{StoreError, StoreResult};
use std::path::{Path, PathBuf};

/// Store configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    data_dir: PathBuf,
}

impl StoreConfig {
    /// Create a new `StoreConfig`.
    pub fn new(data_dir: PathBuf) -> StoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the sharded form documents.
    pub fn forms_dir(&self) -> PathBuf {
        self.data_dir.join(FORMS_DIR_NAME)
    }
}

/// Resolve the data directory from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns the default data
/// directory.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_an_empty_data_dir() {
        let err = StoreConfig::new(PathBuf::new()).expect_err("should reject empty path");

        assert!(matches!(err, StoreError::InvalidInput(msg) if msg.contains("data_dir")));
    }

    #[test]
    fn forms_dir_hangs_off_the_data_dir() {
        let cfg = StoreConfig::new(PathBuf::from("/srv/careboard")).expect("valid config");

        assert_eq!(cfg.forms_dir(), PathBuf::from("/srv/careboard/forms"));
    }

    #[test]
    fn env_value_overrides_the_default_data_dir() {
        assert_eq!(
            data_dir_from_env_value(Some("/var/lib/careboard".to_string())),
            PathBuf::from("/var/lib/careboard")
        );
    }

    #[test]
    fn missing_or_blank_env_values_fall_back_to_the_default() {
        assert_eq!(
            data_dir_from_env_value(None),
            PathBuf::from("careboard_data")
        );
        assert_eq!(
            data_dir_from_env_value(Some("   ".to_string())),
            PathBuf::from("careboard_data")
        );
    }
}
