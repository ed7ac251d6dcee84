//! User-authored settings: the `.hooksmith.yaml` file.
//!
//! Settings are parsed once at the boundary into this typed schema;
//! malformed settings fail loading with a structured error instead of
//! surfacing deep inside the merge algorithm. Defaults, the settings
//! file and `HOOKSMITH_`-prefixed environment variables are merged in
//! that order.

use std::fs;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the settings file, looked up at the repository root.
pub const SETTINGS_FILE_NAME: &str = ".hooksmith.yaml";

const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".tiff", ".psd", ".ico", ".svg",
    // Videos
    ".mp4", ".mkv", ".avi", ".mov", ".mpg", ".vob",
    // Audio
    ".mp3", ".aac", ".wav", ".flac", ".ogg", ".mka", ".wma",
    // Documents
    ".pdf", ".doc", ".xls", ".ppt", ".docx", ".odt", ".drawio",
    // Archives
    ".zip", ".rar", ".7z", ".tar", ".gz", ".iso",
    // Databases
    ".mdb", ".accde", ".frm", ".sqlite",
    // Executables
    ".exe", ".dll", ".so", ".class",
    // Other
    ".pyc", ".lock",
];

/// Errors raised while loading or saving the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to load {file}: {source}")]
    Invalid {
        file: String,
        #[source]
        source: figment::Error,
    },

    #[error("unable to serialize settings: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("unable to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Settings that adjust which repository files hooksmith evaluates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoFilesSettings {
    pub max_file_size: u64,
    pub ignored_file_extensions: Vec<String>,
    /// Glob-style patterns excluded from scanning and, after translation,
    /// from the generated hook configuration.
    pub exclude_file_patterns: Vec<String>,
}

impl Default for RepoFilesSettings {
    fn default() -> Self {
        Self {
            max_file_size: 100_000,
            ignored_file_extensions: DEFAULT_IGNORED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_file_patterns: Vec::new(),
        }
    }
}

/// How much hooksmith tells the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoSettings {
    pub level: EchoLevel,
}

/// Settings for interacting with the external hook runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSupportSettings {
    pub command_timeout_seconds: u64,
}

impl Default for LanguageSupportSettings {
    fn default() -> Self {
        Self {
            command_timeout_seconds: 300,
        }
    }
}

/// A hook-level override within a [`RepoOverride`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookOverride {
    pub id: String,

    /// When set (even to an empty list), replaces the template-supplied
    /// arguments wholesale. When absent, template arguments are kept.
    pub arguments: Option<Vec<String>>,

    /// Appended to whatever arguments exist after any replacement.
    pub additional_args: Vec<String>,

    /// Glob-style patterns whose translated combination becomes the
    /// hook's file-exclusion regex.
    pub exclude_file_patterns: Vec<String>,
}

/// Overrides for one hook repository, matched by URL (case-insensitive).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoOverride {
    pub url: String,
    pub hooks: Vec<HookOverride>,
    pub suppressed_hook_ids: Vec<String>,
}

/// Adjustments layered onto the vendored hook templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreCommitSettings {
    pub repos: Vec<RepoOverride>,
    /// Repo URLs removed from the configuration entirely. Takes
    /// precedence over every hook-level setting for that repo.
    pub suppressed_repos: Vec<String>,
}

/// Settings for the built-in scans.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// User-supplied regexes the custom scan flags wherever they match.
    pub custom_regex_patterns: Vec<String>,
}

/// The full contents of `.hooksmith.yaml`. Absence of the file (or of any
/// section) yields defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repo_files: RepoFilesSettings,
    pub echo: EchoSettings,
    pub language_support: LanguageSupportSettings,
    pub pre_commit: PreCommitSettings,
    pub scan: ScanSettings,
}

impl Settings {
    /// Load settings for the repository rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, SettingsError> {
        let path = root.join(SETTINGS_FILE_NAME);
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(&path))
            .merge(Env::prefixed("HOOKSMITH_"))
            .extract()
            .map_err(|source| SettingsError::Invalid {
                file: path.display().to_string(),
                source,
            })
    }

    /// Persist settings back to the repository's settings file.
    pub fn save(&self, root: &Path) -> Result<(), SettingsError> {
        let path = root.join(SETTINGS_FILE_NAME);
        let serialized = serde_yml::to_string(self)?;
        fs::write(&path, serialized).map_err(|source| SettingsError::Write {
            file: path.display().to_string(),
            source,
        })
    }
}
