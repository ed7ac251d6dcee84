//! Built-in security scans.
//!
//! Two scans run natively (PII detection and user-supplied regex
//! detection); hook-based scans are delegated to the external runner.
//! All of them produce [`ScanResult`]s that merge into a single verdict
//! for the invocation.

pub mod pii;
pub mod scanner;

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;

use crate::git::GitRepo;
use crate::settings::RepoFilesSettings;

/// Which files a scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Only the files staged for the next commit.
    Staged,
    /// Every file in the repository.
    AllFiles,
}

/// A single finding, attributed to the check that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanFailure {
    pub repo: String,
    pub id: String,
    pub file: String,
}

/// The outcome of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub successful: bool,
    pub output: String,
    pub failures: Vec<ScanFailure>,
}

impl ScanResult {
    pub fn clean() -> Self {
        Self {
            successful: true,
            output: String::new(),
            failures: Vec::new(),
        }
    }
}

/// Fold several scan results into one.
pub fn merge_scan_results(results: Vec<ScanResult>) -> ScanResult {
    let successful = results.iter().all(|r| r.successful);
    let output = results
        .iter()
        .map(|r| r.output.trim_end())
        .filter(|o| !o.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let failures = results.into_iter().flat_map(|r| r.failures).collect();

    ScanResult {
        successful,
        output,
        failures,
    }
}

/// Resolve the list of files a scan should cover.
///
/// Staged mode asks git for the index; all-files mode walks the tree
/// gitignore-aware. Either way, the settings' exclusion globs are
/// honored.
pub fn files_for_mode(
    root: &Path,
    mode: ScanMode,
    repo_files: &RepoFilesSettings,
) -> Result<Vec<PathBuf>> {
    let files = match mode {
        ScanMode::Staged => GitRepo::discover(root)?.staged_files()?,
        ScanMode::AllFiles => {
            let mut files = Vec::new();
            for entry in WalkBuilder::new(root).build() {
                let Ok(entry) = entry else { continue };
                if entry.file_type().is_some_and(|t| t.is_file()) {
                    files.push(entry.into_path());
                }
            }
            files.sort();
            files
        }
    };

    let exclusions = build_exclusion_globset(&repo_files.exclude_file_patterns)?;
    Ok(files
        .into_iter()
        .filter(|file| {
            let relative = file.strip_prefix(root).unwrap_or(file);
            !exclusions.is_match(relative)
        })
        .collect())
}

fn build_exclusion_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // Directory patterns like "vendor/" must match everything below.
        let expanded = if pattern.ends_with('/') {
            format!("{pattern}**")
        } else {
            pattern.clone()
        };
        builder.add(Glob::new(&expanded)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_combines_failures_and_success() {
        let clean = ScanResult::clean();
        let dirty = ScanResult {
            successful: false,
            output: "found something".to_string(),
            failures: vec![ScanFailure {
                repo: "hooksmith".to_string(),
                id: "check-pii".to_string(),
                file: "main.py".to_string(),
            }],
        };

        let merged = merge_scan_results(vec![clean, dirty]);
        assert!(!merged.successful);
        assert_eq!(merged.failures.len(), 1);
        assert_eq!(merged.output, "found something");
    }

    #[test]
    fn merge_of_clean_results_is_clean() {
        let merged = merge_scan_results(vec![ScanResult::clean(), ScanResult::clean()]);
        assert!(merged.successful);
        assert!(merged.failures.is_empty());
    }

    #[test]
    fn all_files_mode_honors_exclusion_globs() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app.py"), "pass").unwrap();
        fs::create_dir(temp_dir.path().join("vendor")).unwrap();
        fs::write(temp_dir.path().join("vendor").join("lib.py"), "pass").unwrap();

        let repo_files = RepoFilesSettings {
            exclude_file_patterns: vec!["vendor/".to_string()],
            ..Default::default()
        };
        let files = files_for_mode(temp_dir.path(), ScanMode::AllFiles, &repo_files).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.py"));
    }
}
