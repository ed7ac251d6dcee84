//! Typed model of a pre-commit hook configuration document.
//!
//! Templates, user-accumulated config files and the synthesized output all
//! share this shape. Keys the engine does not model (hook `name`, `entry`,
//! top-level `default_stages`, ...) are carried through a flattened map so
//! merging never destroys content it does not understand.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One automated check contributed by a hook repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDefinition {
    pub id: String,

    /// Arguments passed to the hook. `None` means "whatever the template
    /// says"; `Some(vec![])` is an explicit empty argument list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Regex of file paths this hook must not run against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

impl HookDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: None,
            exclude: None,
            extra: BTreeMap::new(),
        }
    }
}

/// A hook-source definition: URL, pinned revision and the hooks it offers.
///
/// The URL is the identity key when matching repos across template and
/// override layers; comparisons are case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoDefinition {
    pub repo: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub hooks: Vec<HookDefinition>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

impl RepoDefinition {
    /// Whether this repo definition refers to the given URL, ignoring case.
    pub fn matches_url(&self, url: &str) -> bool {
        self.repo.eq_ignore_ascii_case(url)
    }
}

/// A full hook configuration document: the unit templates contribute and
/// the type of the final synthesized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repos: Vec<RepoDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yml::Value>,
}

impl ConfigDocument {
    /// Parse a document from YAML text. An empty document is a valid,
    /// empty configuration; `repos: null` is an empty repo list.
    pub fn parse(raw: &str) -> Result<Self, serde_yml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(raw)
    }

    /// Serialize the document as YAML. Field order is fixed by the struct
    /// and unknown keys are stored sorted, so serialization is
    /// deterministic for equal logical content.
    pub fn to_yaml(&self) -> Result<String, serde_yml::Error> {
        serde_yml::to_string(self)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let parsed = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_document() {
        let doc = ConfigDocument::parse("").unwrap();
        assert!(doc.repos.is_empty());
        assert!(doc.exclude.is_none());
    }

    #[test]
    fn parses_null_repo_list() {
        let doc = ConfigDocument::parse("repos:\n").unwrap();
        assert!(doc.repos.is_empty());
    }

    #[test]
    fn preserves_unmodeled_keys_through_round_trip() {
        let raw = "\
default_stages:
- commit
repos:
- repo: https://github.com/example/hooks
  rev: v1.0.0
  hooks:
  - id: check-things
    name: Check the things
";
        let doc = ConfigDocument::parse(raw).unwrap();
        assert!(doc.extra.contains_key("default_stages"));
        assert_eq!(doc.repos[0].hooks[0].id, "check-things");
        assert!(doc.repos[0].hooks[0].extra.contains_key("name"));

        let round_tripped = ConfigDocument::parse(&doc.to_yaml().unwrap()).unwrap();
        assert_eq!(doc, round_tripped);
    }

    #[test]
    fn url_match_ignores_case() {
        let repo = RepoDefinition {
            repo: "https://github.com/Example/Hooks".to_string(),
            rev: Some("v1".to_string()),
            hooks: vec![],
            extra: BTreeMap::new(),
        };
        assert!(repo.matches_url("https://github.com/example/hooks"));
        assert!(!repo.matches_url("https://github.com/example/other"));
    }
}
