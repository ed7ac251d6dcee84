//! Durable record of what was last successfully installed.
//!
//! The state lives at `.hooksmith/repo-config.yaml`. It is created empty
//! on first run, overwritten wholesale on every successful install and
//! never partially mutated. Older releases stored a single
//! `overall_language`; that schema is still recognized so it can be
//! migrated forward.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory holding all hooksmith-generated files, relative to the
/// repository root.
pub const STATE_DIR: &str = ".hooksmith";

const STATE_FILE: &str = "repo-config.yaml";

/// What was last successfully installed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedInstallState {
    pub languages: Option<Vec<String>>,
    pub version_installed: Option<String>,
}

impl PersistedInstallState {
    /// Whether this state records a completed install.
    pub fn is_installed(&self) -> bool {
        self.languages.is_some() && self.version_installed.is_some()
    }
}

/// Pre-languages-list schema, kept only so `migrate` can read it.
#[derive(Debug, Clone, Default, Deserialize)]
struct DeprecatedInstallState {
    overall_language: Option<String>,
    version_installed: Option<String>,
}

/// Schema health of the on-disk state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Missing,
    UpToDate,
    OutOfDate,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to read install state: {0}")]
    Io(#[from] std::io::Error),

    #[error("install state is not valid YAML: {0}")]
    Parse(#[from] serde_yml::Error),
}

/// Saves and loads the persisted install state for one repository.
#[derive(Debug, Clone)]
pub struct InstallStateStore {
    root: PathBuf,
}

impl InstallStateStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(STATE_FILE)
    }

    /// Load the state, or an empty state when the file does not exist.
    pub fn load(&self) -> Result<PersistedInstallState, StoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(PersistedInstallState::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_yml::from_str(&raw)?)
    }

    /// Overwrite the state wholesale.
    pub fn save(&self, state: &PersistedInstallState) -> Result<(), StoreError> {
        fs::create_dir_all(self.root.join(STATE_DIR))?;
        let serialized = serde_yml::to_string(state)?;
        fs::write(self.state_path(), serialized)?;
        Ok(())
    }

    /// Check whether the on-disk state matches the current schema.
    ///
    /// Any key the current schema does not define marks the file as out of
    /// date; an unreadable file is also reported out of date so the
    /// migration path gets a chance to surface the real problem.
    pub fn verify(&self) -> Result<SchemaStatus, StoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(SchemaStatus::Missing);
        }
        let raw = fs::read_to_string(&path)?;
        let Ok(parsed) = serde_yml::from_str::<serde_yml::Mapping>(&raw) else {
            return Ok(SchemaStatus::OutOfDate);
        };

        let expected = ["languages", "version_installed"];
        for key in parsed.keys() {
            let known = key
                .as_str()
                .is_some_and(|name| expected.contains(&name));
            if !known {
                return Ok(SchemaStatus::OutOfDate);
            }
        }
        Ok(SchemaStatus::UpToDate)
    }

    /// Read a deprecated-schema state file and map it into the current
    /// schema. Nothing is written; the caller persists the result, so a
    /// failed migration leaves the old file untouched.
    pub fn migrate(&self) -> Result<PersistedInstallState, StoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(PersistedInstallState::default());
        }
        let raw = fs::read_to_string(&path)?;
        let old: DeprecatedInstallState = serde_yml::from_str(&raw)?;

        Ok(PersistedInstallState {
            languages: old.overall_language.map(|language| vec![language]),
            version_installed: old.version_installed,
        })
    }
}
