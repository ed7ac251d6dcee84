//! Detection of personally identifiable information.
//!
//! Lines are lowercased before matching, a `disable-pii-scan` marker on
//! the line suppresses findings, and file types that are overwhelmingly
//! noise (lockfiles, images, stylesheets) are never scanned.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;

use super::{ScanFailure, ScanResult};

/// Inline marker that exempts a line from PII scanning.
pub const DISABLE_PII_MARKER: &str = "disable-pii-scan";

/// Identifier the scan reports failures under.
pub const PII_SCAN_ID: &str = "check-pii";

const IGNORED_EXTENSIONS: &[&str] = &[
    ".md", ".lock", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".eot", ".ttf", ".woff",
    ".css",
];

lazy_static! {
    static ref PII_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "Email",
            Regex::new(r"\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,7}\b").unwrap(),
        ),
        (
            "Social security number",
            Regex::new(r"\b[0-9]{3}[- ][0-9]{2}[- ][0-9]{4}\b").unwrap(),
        ),
        (
            "Phone number",
            Regex::new(r"[\+]?[(]?[0-9]{3}[)]?[-\s\.]?[0-9]{3}[-\s\.]?[0-9]{4,6}").unwrap(),
        ),
    ];
}

#[derive(Debug, Clone)]
struct PiiFinding {
    file: PathBuf,
    line_num: usize,
    pii_key: &'static str,
}

/// Scans files for potential PII.
#[derive(Debug, Default)]
pub struct PiiScanner;

impl PiiScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan the given files, reporting findings relative to `root`.
    pub fn scan_files(&self, root: &Path, files: &[PathBuf]) -> ScanResult {
        let findings: Vec<PiiFinding> = files
            .par_iter()
            .filter(|file| !extension_ignored(file))
            .flat_map(|file| scan_one(file))
            .collect();

        let mut output = String::new();
        let mut failures: Vec<ScanFailure> = Vec::new();
        for finding in &findings {
            let display = finding
                .file
                .strip_prefix(root)
                .unwrap_or(&finding.file)
                .display();
            output.push_str(&format!(
                "{}:{}: potential {} found\n",
                display, finding.line_num, finding.pii_key
            ));
            let file = display.to_string();
            if !failures.iter().any(|f| f.file == file) {
                failures.push(ScanFailure {
                    repo: crate::PKG_NAME.to_string(),
                    id: PII_SCAN_ID.to_string(),
                    file,
                });
            }
        }

        ScanResult {
            successful: findings.is_empty(),
            output,
            failures,
        }
    }
}

fn scan_one(file: &Path) -> Vec<PiiFinding> {
    let Ok(contents) = fs::read_to_string(file) else {
        tracing::debug!(file = %file.display(), "unreadable file skipped by PII scan");
        return Vec::new();
    };

    let mut findings = Vec::new();
    for (line_num, line) in contents.lines().enumerate() {
        if line.contains(DISABLE_PII_MARKER) {
            continue;
        }
        let lowered = line.to_lowercase();
        for (pii_key, pattern) in PII_PATTERNS.iter() {
            if pattern.is_match(&lowered) {
                findings.push(PiiFinding {
                    file: file.to_path_buf(),
                    line_num: line_num + 1,
                    pii_key,
                });
            }
        }
    }
    findings
}

fn extension_ignored(file: &Path) -> bool {
    let Some(extension) = file.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let dotted = format!(".{}", extension.to_lowercase());
    IGNORED_EXTENSIONS.contains(&dotted.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_emails_and_reports_the_file_once() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("contacts.py");
        fs::write(
            &file,
            "OWNER = \"jane.doe@example.com\"\nBACKUP = \"john.roe@example.com\"\n",
        )
        .unwrap();

        let result = PiiScanner::new().scan_files(temp_dir.path(), &[file]);

        assert!(!result.successful);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].id, PII_SCAN_ID);
        assert_eq!(result.failures[0].file, "contacts.py");
        assert!(result.output.contains("potential Email"));
    }

    #[test]
    fn disable_marker_suppresses_the_line() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("config.py");
        fs::write(
            &file,
            "SUPPORT = \"help@example.com\"  # disable-pii-scan\n",
        )
        .unwrap();

        let result = PiiScanner::new().scan_files(temp_dir.path(), &[file]);
        assert!(result.successful);
    }

    #[test]
    fn markdown_files_are_not_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("README.md");
        fs::write(&file, "Contact jane.doe@example.com for details\n").unwrap();

        let result = PiiScanner::new().scan_files(temp_dir.path(), &[file]);
        assert!(result.successful);
    }

    #[test]
    fn finds_ssn_shaped_values() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("seed.sql");
        fs::write(&file, "INSERT INTO people VALUES ('123-45-6789');\n").unwrap();

        let result = PiiScanner::new().scan_files(temp_dir.path(), &[file]);
        assert!(!result.successful);
        assert!(result.output.contains("Social security number"));
    }
}
