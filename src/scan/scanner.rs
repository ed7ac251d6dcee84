//! User-supplied regex detection.
//!
//! Settings may carry arbitrary regexes (internal hostnames, ticket
//! markers, proprietary key shapes); this scan flags every line that
//! matches one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use super::{ScanFailure, ScanResult};

/// Identifier the scan reports failures under.
pub const REGEX_SCAN_ID: &str = "check-regex";

#[derive(Debug, Clone)]
struct RegexFinding {
    file: PathBuf,
    line_num: usize,
    pattern: String,
}

/// Scans files against user-configured regexes.
#[derive(Debug)]
pub struct CustomRegexScanner {
    patterns: Vec<Regex>,
}

impl CustomRegexScanner {
    /// Compile the configured patterns. Invalid patterns are rejected
    /// here, at the boundary, with the offending pattern named.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid custom scan pattern: {pattern}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns: compiled })
    }

    /// Scan the given files, reporting findings relative to `root`.
    pub fn scan_files(&self, root: &Path, files: &[PathBuf]) -> ScanResult {
        if self.patterns.is_empty() {
            return ScanResult::clean();
        }

        let findings: Vec<RegexFinding> = files
            .par_iter()
            .flat_map(|file| self.scan_one(file))
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
                "{}:{}: matched custom pattern '{}'\n",
                display, finding.line_num, finding.pattern
            ));
            let file = display.to_string();
            if !failures.iter().any(|f| f.file == file) {
                failures.push(ScanFailure {
                    repo: crate::PKG_NAME.to_string(),
                    id: REGEX_SCAN_ID.to_string(),
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

    fn scan_one(&self, file: &Path) -> Vec<RegexFinding> {
        let Ok(contents) = fs::read_to_string(file) else {
            tracing::debug!(file = %file.display(), "unreadable file skipped by custom regex scan");
            return Vec::new();
        };

        let mut findings = Vec::new();
        for (line_num, line) in contents.lines().enumerate() {
            for pattern in &self.patterns {
                if pattern.is_match(line) {
                    findings.push(RegexFinding {
                        file: file.to_path_buf(),
                        line_num: line_num + 1,
                        pattern: pattern.as_str().to_string(),
                    });
                }
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn flags_lines_matching_configured_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("deploy.sh");
        fs::write(&file, "curl https://internal-4711.example.net\n").unwrap();

        let scanner = CustomRegexScanner::new(&["internal-[0-9]+".to_string()]).unwrap();
        let result = scanner.scan_files(temp_dir.path(), &[file]);

        assert!(!result.successful);
        assert_eq!(result.failures[0].id, REGEX_SCAN_ID);
        assert!(result.output.contains("internal-[0-9]+"));
    }

    #[test]
    fn no_patterns_means_a_clean_result() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("anything.txt");
        fs::write(&file, "content\n").unwrap();

        let scanner = CustomRegexScanner::new(&[]).unwrap();
        let result = scanner.scan_files(temp_dir.path(), &[file]);
        assert!(result.successful);
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let err = CustomRegexScanner::new(&["[unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid custom scan pattern"));
    }
}
