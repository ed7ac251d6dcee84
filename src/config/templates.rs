//! Vendored hook-template store.
//!
//! Each supported language ships a `base/<slug>-pre-commit.yaml` template
//! with its always-on hooks, optionally a `lint/<slug>-pre-commit.yaml`
//! with opt-in linters, and optionally a `configs/<slug>.config.yaml` with
//! side-config files those linters need. A fixed
//! `secrets_detecting_repos.yaml` maps hook repository URLs to the hook
//! IDs usable for secrets detection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::ConfigDocument;

/// Map of illegal characters to words so that symbolic language names
/// ("C#", "F*") stay distinguishable after slugification instead of
/// collapsing to the same resource name.
const ILLEGAL_CHARACTER_MAPPINGS: &[(&str, &str)] = &[
    ("#", "Sharp"),
    ("%", "Percent"),
    ("&", "Ampersand"),
    ("{", "LeftCurlyBracket"),
    ("}", "RightCurlyBracket"),
    ("\\", "BackSlash"),
    ("<", "LeftAngleBracket"),
    (">", "RightAngleBracket"),
    ("*", "Star"),
    ("?", "Question"),
    ("/", "ForwardSlash"),
    ("$", "DollarSign"),
    ("!", "Exclamation"),
    (":", "Colon"),
    ("@", "At"),
    ("+", "Plus"),
];

static VENDORED_TEMPLATES: &[(&str, &str)] = &[
    (
        "base/base-pre-commit.yaml",
        include_str!("../../templates/base/base-pre-commit.yaml"),
    ),
    (
        "lint/base-pre-commit.yaml",
        include_str!("../../templates/lint/base-pre-commit.yaml"),
    ),
    (
        "base/python-pre-commit.yaml",
        include_str!("../../templates/base/python-pre-commit.yaml"),
    ),
    (
        "lint/python-pre-commit.yaml",
        include_str!("../../templates/lint/python-pre-commit.yaml"),
    ),
    (
        "base/javascript-pre-commit.yaml",
        include_str!("../../templates/base/javascript-pre-commit.yaml"),
    ),
    (
        "lint/javascript-pre-commit.yaml",
        include_str!("../../templates/lint/javascript-pre-commit.yaml"),
    ),
    (
        "base/typescript-pre-commit.yaml",
        include_str!("../../templates/base/typescript-pre-commit.yaml"),
    ),
    (
        "lint/typescript-pre-commit.yaml",
        include_str!("../../templates/lint/typescript-pre-commit.yaml"),
    ),
    (
        "base/go-pre-commit.yaml",
        include_str!("../../templates/base/go-pre-commit.yaml"),
    ),
    (
        "lint/go-pre-commit.yaml",
        include_str!("../../templates/lint/go-pre-commit.yaml"),
    ),
    (
        "base/terraform-pre-commit.yaml",
        include_str!("../../templates/base/terraform-pre-commit.yaml"),
    ),
    (
        "lint/terraform-pre-commit.yaml",
        include_str!("../../templates/lint/terraform-pre-commit.yaml"),
    ),
    (
        "base/csharp-pre-commit.yaml",
        include_str!("../../templates/base/csharp-pre-commit.yaml"),
    ),
    (
        "lint/csharp-pre-commit.yaml",
        include_str!("../../templates/lint/csharp-pre-commit.yaml"),
    ),
    (
        "base/java-pre-commit.yaml",
        include_str!("../../templates/base/java-pre-commit.yaml"),
    ),
    (
        "lint/java-pre-commit.yaml",
        include_str!("../../templates/lint/java-pre-commit.yaml"),
    ),
    (
        "base/kotlin-pre-commit.yaml",
        include_str!("../../templates/base/kotlin-pre-commit.yaml"),
    ),
    (
        "lint/kotlin-pre-commit.yaml",
        include_str!("../../templates/lint/kotlin-pre-commit.yaml"),
    ),
    (
        "base/swift-pre-commit.yaml",
        include_str!("../../templates/base/swift-pre-commit.yaml"),
    ),
    (
        "lint/swift-pre-commit.yaml",
        include_str!("../../templates/lint/swift-pre-commit.yaml"),
    ),
    (
        "base/ruby-pre-commit.yaml",
        include_str!("../../templates/base/ruby-pre-commit.yaml"),
    ),
    (
        "lint/ruby-pre-commit.yaml",
        include_str!("../../templates/lint/ruby-pre-commit.yaml"),
    ),
    (
        "configs/javascript.config.yaml",
        include_str!("../../templates/configs/javascript.config.yaml"),
    ),
    (
        "configs/typescript.config.yaml",
        include_str!("../../templates/configs/typescript.config.yaml"),
    ),
    (
        "secrets_detecting_repos.yaml",
        include_str!("../../templates/secrets_detecting_repos.yaml"),
    ),
];

/// Errors raised while resolving language templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("language '{0}' is currently unsupported")]
    LanguageNotSupported(String),

    #[error("template '{name}' is not valid YAML: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_yml::Error,
    },
}

/// One side-config file a linter needs, e.g. an `.eslintrc.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterConfigFile {
    pub filename: String,
    pub settings: serde_yml::Value,
}

/// All side-config files contributed by one language's linters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterConfigBundle {
    pub language: String,
    pub files: Vec<LinterConfigFile>,
}

/// Read-only store of hook templates, keyed by resource name.
///
/// The default store holds the vendored templates compiled into the
/// binary; tests construct in-memory stores from arbitrary entries.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    files: BTreeMap<String, String>,
}

impl TemplateStore {
    /// The store of templates shipped with this build.
    pub fn vendored() -> Self {
        Self {
            files: VENDORED_TEMPLATES
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        }
    }

    /// Build a store from explicit entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            files: entries
                .into_iter()
                .map(|(name, content)| (name.into(), content.into()))
                .collect(),
        }
    }

    /// Raw text of a named resource, if present.
    pub fn read(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// Whether a base template exists for the given language.
    pub fn supports(&self, language: &str) -> bool {
        self.files
            .contains_key(&format!("base/{}-pre-commit.yaml", slugify(language)))
    }

    /// Load a language's template document.
    ///
    /// The base template is mandatory; a missing base template means the
    /// language is unsupported. The lint template, when requested and
    /// present, has its repos appended after the base repos. Languages
    /// without a dedicated lint template are legal.
    pub fn load_language(
        &self,
        language: &str,
        include_lint: bool,
    ) -> Result<ConfigDocument, TemplateError> {
        let slug = slugify(language);
        let base_name = format!("base/{slug}-pre-commit.yaml");
        let raw = self
            .read(&base_name)
            .ok_or_else(|| TemplateError::LanguageNotSupported(language.to_string()))?;
        let mut document = parse_template(&base_name, raw)?;

        if include_lint {
            let lint_name = format!("lint/{slug}-pre-commit.yaml");
            if let Some(raw) = self.read(&lint_name) {
                let lint = parse_template(&lint_name, raw)?;
                document.repos.extend(lint.repos);
            } else {
                tracing::debug!(language, "no lint template for language");
            }
        }

        Ok(document)
    }

    /// Load a language's linter side-config bundle, if one is vendored.
    pub fn linter_config(
        &self,
        language: &str,
    ) -> Result<Option<LinterConfigBundle>, TemplateError> {
        let name = format!("configs/{}.config.yaml", slugify(language));
        let Some(raw) = self.read(&name) else {
            return Ok(None);
        };
        let files: Vec<LinterConfigFile> =
            serde_yml::from_str(raw).map_err(|source| TemplateError::Malformed {
                name,
                source,
            })?;
        Ok(Some(LinterConfigBundle {
            language: language.to_string(),
            files,
        }))
    }

    /// Map of hook repository URL (lowercased) to the hook IDs usable for
    /// secrets detection.
    pub fn secrets_detecting_repos(
        &self,
    ) -> Result<BTreeMap<String, Vec<String>>, TemplateError> {
        let name = "secrets_detecting_repos.yaml";
        let Some(raw) = self.read(name) else {
            return Ok(BTreeMap::new());
        };
        let parsed: BTreeMap<String, Vec<String>> =
            serde_yml::from_str(raw).map_err(|source| TemplateError::Malformed {
                name: name.to_string(),
                source,
            })?;
        Ok(parsed
            .into_iter()
            .map(|(url, hooks)| (url.to_lowercase(), hooks))
            .collect())
    }
}

fn parse_template(name: &str, raw: &str) -> Result<ConfigDocument, TemplateError> {
    ConfigDocument::parse(raw).map_err(|source| TemplateError::Malformed {
        name: name.to_string(),
        source,
    })
}

/// Reduce a language name to the slug used in template resource names.
///
/// Symbolic characters are first replaced with words, then the result is
/// lowercased, whitespace and hyphen runs become single hyphens, and
/// anything outside `[a-z0-9_-]` is dropped.
pub fn slugify(value: &str) -> String {
    let mut value = value.to_string();
    for (illegal, replacement) in ILLEGAL_CHARACTER_MAPPINGS {
        value = value.replace(illegal, replacement);
    }

    let lowered = value.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = !slug.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
    }
    slug.trim_matches(['-', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_handles_plain_names() {
        assert_eq!(slugify("Python"), "python");
        assert_eq!(slugify("JavaScript"), "javascript");
    }

    #[test]
    fn slugify_replaces_symbolic_characters() {
        assert_eq!(slugify("C#"), "csharp");
        assert_eq!(slugify("C++"), "cplusplus");
        assert_eq!(slugify("F*"), "fstar");
    }

    #[test]
    fn slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("Objective   C"), "objective-c");
        assert_eq!(slugify("  Shell  "), "shell");
    }

    #[test]
    fn vendored_store_supports_python() {
        let store = TemplateStore::vendored();
        assert!(store.supports("Python"));
        assert!(!store.supports("COBOL"));
    }

    #[test]
    fn loading_unknown_language_is_a_typed_error() {
        let store = TemplateStore::vendored();
        let err = store.load_language("COBOL", false).unwrap_err();
        assert!(matches!(err, TemplateError::LanguageNotSupported(name) if name == "COBOL"));
    }

    #[test]
    fn lint_repos_are_appended_after_base_repos() {
        let store = TemplateStore::from_entries([
            (
                "base/python-pre-commit.yaml",
                "repos:\n- repo: https://example.com/base\n  rev: v1\n  hooks:\n  - id: a\n",
            ),
            (
                "lint/python-pre-commit.yaml",
                "repos:\n- repo: https://example.com/lint\n  rev: v1\n  hooks:\n  - id: b\n",
            ),
        ]);

        let base_only = store.load_language("Python", false).unwrap();
        assert_eq!(base_only.repos.len(), 1);

        let with_lint = store.load_language("Python", true).unwrap();
        let urls: Vec<&str> = with_lint.repos.iter().map(|r| r.repo.as_str()).collect();
        assert_eq!(urls, ["https://example.com/base", "https://example.com/lint"]);
    }

    #[test]
    fn missing_lint_template_is_tolerated() {
        let store = TemplateStore::from_entries([(
            "base/go-pre-commit.yaml",
            "repos:\n- repo: https://example.com/go\n  rev: v1\n  hooks:\n  - id: fmt\n",
        )]);
        let doc = store.load_language("Go", true).unwrap();
        assert_eq!(doc.repos.len(), 1);
    }

    #[test]
    fn vendored_templates_all_parse() {
        let store = TemplateStore::vendored();
        for language in [
            "base",
            "Python",
            "JavaScript",
            "TypeScript",
            "Go",
            "Terraform",
            "C#",
            "Java",
            "Kotlin",
            "Swift",
            "Ruby",
        ] {
            store
                .load_language(language, true)
                .unwrap_or_else(|err| panic!("{language}: {err}"));
        }
    }

    #[test]
    fn secrets_detecting_repos_are_lowercased() {
        let store = TemplateStore::from_entries([(
            "secrets_detecting_repos.yaml",
            "https://github.com/Example/Detect:\n- find-secrets\n",
        )]);
        let repos = store.secrets_detecting_repos().unwrap();
        assert_eq!(
            repos.get("https://github.com/example/detect"),
            Some(&vec!["find-secrets".to_string()])
        );
    }
}
