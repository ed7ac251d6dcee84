//! Repository language detection.
//!
//! Walks the working tree (gitignore-aware) and attributes files to
//! languages by extension and well-known file names. Oversized files are
//! reported as skipped rather than silently dropped; extensions from the
//! settings' ignore table never count toward any language.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;

use crate::settings::RepoFilesSettings;

/// Extension (without dot) or exact file name to language name.
static LANGUAGE_MARKERS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("go", "Go"),
    ("tf", "Terraform"),
    ("tfvars", "Terraform"),
    ("cs", "C#"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("swift", "Swift"),
    ("rb", "Ruby"),
];

/// A file excluded from analysis, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub file_path: PathBuf,
    pub error_message: String,
}

/// The result of the analysis phase.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeResult {
    /// Language name to share of attributed files, most prevalent first.
    pub language_proportions: Vec<(String, f64)>,
    pub skipped_files: Vec<SkippedFile>,
}

impl AnalyzeResult {
    pub fn new(language_proportions: Vec<(String, f64)>, skipped_files: Vec<SkippedFile>) -> Self {
        Self {
            language_proportions,
            skipped_files,
        }
    }

    /// Detected language names, most prevalent first.
    pub fn languages(&self) -> Vec<String> {
        self.language_proportions
            .iter()
            .map(|(language, _)| language.clone())
            .collect()
    }
}

/// Detects which languages a repository contains.
pub struct LanguageAnalyzer<'a> {
    repo_files: &'a RepoFilesSettings,
}

impl<'a> LanguageAnalyzer<'a> {
    pub fn new(repo_files: &'a RepoFilesSettings) -> Self {
        Self { repo_files }
    }

    /// Analyze the repository rooted at `root`.
    pub fn analyze(&self, root: &Path) -> Result<AnalyzeResult> {
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut total = 0usize;
        let mut skipped_files = Vec::new();

        for entry in WalkBuilder::new(root).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "walk error during language analysis");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if self.extension_ignored(path) {
                continue;
            }
            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.repo_files.max_file_size {
                    skipped_files.push(SkippedFile {
                        file_path: path.to_path_buf(),
                        error_message: format!(
                            "{} exceeds the maximum file size ({} bytes)",
                            path.display(),
                            self.repo_files.max_file_size
                        ),
                    });
                    continue;
                }
            }

            if let Some(language) = language_for(path) {
                *counts.entry(language).or_default() += 1;
                total += 1;
            }
        }

        let mut proportions: Vec<(String, f64)> = counts
            .into_iter()
            .map(|(language, count)| (language.to_string(), count as f64 / total as f64))
            .collect();
        // Most prevalent first; names break ties so output order is stable.
        proportions.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        tracing::debug!(?proportions, skipped = skipped_files.len(), "language analysis complete");
        Ok(AnalyzeResult::new(proportions, skipped_files))
    }

    fn extension_ignored(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", extension.to_lowercase());
        self.repo_files
            .ignored_file_extensions
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(&dotted))
    }
}

fn language_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    LANGUAGE_MARKERS
        .iter()
        .find(|(marker, _)| *marker == extension)
        .map(|(_, language)| *language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RepoFilesSettings;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detects_languages_by_prevalence() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app.py"), "print('hi')").unwrap();
        fs::write(temp_dir.path().join("util.py"), "pass").unwrap();
        fs::write(temp_dir.path().join("index.js"), "void 0;").unwrap();

        let repo_files = RepoFilesSettings::default();
        let analyzer = LanguageAnalyzer::new(&repo_files);
        let result = analyzer.analyze(temp_dir.path()).unwrap();

        assert_eq!(
            result.languages(),
            vec!["Python".to_string(), "JavaScript".to_string()]
        );
        assert!((result.language_proportions[0].1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_extensions_are_not_attributed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();

        let repo_files = RepoFilesSettings::default();
        let analyzer = LanguageAnalyzer::new(&repo_files);
        let result = analyzer.analyze(temp_dir.path()).unwrap();

        assert!(result.languages().is_empty());
        assert!(result.skipped_files.is_empty());
    }

    #[test]
    fn oversized_files_are_reported_as_skipped() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("big.py"), "x".repeat(64)).unwrap();
        fs::write(temp_dir.path().join("small.rb"), "puts 1").unwrap();

        let repo_files = RepoFilesSettings {
            max_file_size: 32,
            ..Default::default()
        };
        let analyzer = LanguageAnalyzer::new(&repo_files);
        let result = analyzer.analyze(temp_dir.path()).unwrap();

        assert_eq!(result.languages(), vec!["Ruby".to_string()]);
        assert_eq!(result.skipped_files.len(), 1);
        assert!(result.skipped_files[0]
            .error_message
            .contains("maximum file size"));
    }

    #[test]
    fn ignored_extensions_never_count() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("gen.py"), "pass").unwrap();

        let repo_files = RepoFilesSettings {
            ignored_file_extensions: vec![".py".to_string()],
            ..Default::default()
        };
        let analyzer = LanguageAnalyzer::new(&repo_files);
        let result = analyzer.analyze(temp_dir.path()).unwrap();

        assert!(result.languages().is_empty());
    }
}
