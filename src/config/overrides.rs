//! Application of user overrides onto a loaded template document.
//!
//! Overrides run in a fixed order per repo: wholesale repo suppression
//! first (which short-circuits everything else for that repo), then hook
//! suppression, then per-hook argument replacement, additional-argument
//! append and file-exclusion rewrite. Repos without a matching override
//! pass through untouched.

use crate::settings::PreCommitSettings;
use crate::shared::patterns::{combine_patterns, glob_to_regex};

use super::document::ConfigDocument;

/// Apply `settings` to `config`, returning the adjusted document.
pub fn apply_overrides(mut config: ConfigDocument, settings: &PreCommitSettings) -> ConfigDocument {
    let mut repos = Vec::with_capacity(config.repos.len());

    for mut repo in config.repos {
        if settings
            .suppressed_repos
            .iter()
            .any(|url| repo.matches_url(url))
        {
            tracing::debug!(url = %repo.repo, "repo suppressed by settings");
            continue;
        }

        // At most one override per URL is expected; first match wins.
        let Some(repo_override) = settings.repos.iter().find(|o| repo.matches_url(&o.url)) else {
            repos.push(repo);
            continue;
        };

        if !repo_override.suppressed_hook_ids.is_empty() {
            repo.hooks.retain(|hook| {
                !repo_override
                    .suppressed_hook_ids
                    .iter()
                    .any(|id| id == &hook.id)
            });
        }
        if repo.hooks.is_empty() {
            tracing::debug!(url = %repo.repo, "all hooks suppressed, removing repo");
            continue;
        }

        for hook_override in &repo_override.hooks {
            // A hook that was just suppressed (or never existed) has
            // nothing to override.
            let Some(hook) = repo.hooks.iter_mut().find(|h| h.id == hook_override.id) else {
                continue;
            };

            if let Some(arguments) = &hook_override.arguments {
                hook.args = Some(arguments.clone());
            }
            if !hook_override.additional_args.is_empty() {
                hook.args
                    .get_or_insert_with(Vec::new)
                    .extend(hook_override.additional_args.iter().cloned());
            }
            if !hook_override.exclude_file_patterns.is_empty() {
                let fragments: Vec<String> = hook_override
                    .exclude_file_patterns
                    .iter()
                    .map(|pattern| glob_to_regex(pattern))
                    .collect();
                hook.exclude = combine_patterns(&fragments);
            }
        }

        repos.push(repo);
    }

    config.repos = repos;
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::{HookDefinition, RepoDefinition};
    use crate::settings::{HookOverride, RepoOverride};
    use std::collections::BTreeMap;

    fn repo(url: &str, hook_ids: &[&str]) -> RepoDefinition {
        RepoDefinition {
            repo: url.to_string(),
            rev: Some("v1.0.0".to_string()),
            hooks: hook_ids.iter().map(|id| HookDefinition::new(*id)).collect(),
            extra: BTreeMap::new(),
        }
    }

    fn document(repos: Vec<RepoDefinition>) -> ConfigDocument {
        ConfigDocument {
            repos,
            exclude: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn no_overrides_leaves_document_untouched() {
        let doc = document(vec![repo("https://example.com/a", &["one", "two"])]);
        let result = apply_overrides(doc.clone(), &PreCommitSettings::default());
        assert_eq!(result, doc);
    }

    #[test]
    fn argument_override_replaces_then_appends() {
        let mut doc = document(vec![repo("https://example.com/a", &["check"])]);
        doc.repos[0].hooks[0].args = Some(vec!["orig".to_string()]);

        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    arguments: Some(vec!["a".to_string(), "b".to_string()]),
                    additional_args: vec!["c".to_string()],
                    exclude_file_patterns: vec![],
                }],
                suppressed_hook_ids: vec![],
            }],
            suppressed_repos: vec![],
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(
            result.repos[0].hooks[0].args,
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn empty_argument_list_still_replaces() {
        let mut doc = document(vec![repo("https://example.com/a", &["check"])]);
        doc.repos[0].hooks[0].args = Some(vec!["orig".to_string()]);

        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    arguments: Some(vec![]),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(result.repos[0].hooks[0].args, Some(vec![]));
    }

    #[test]
    fn unset_arguments_leave_template_arguments_alone() {
        let mut doc = document(vec![repo("https://example.com/a", &["check"])]);
        doc.repos[0].hooks[0].args = Some(vec!["orig".to_string()]);

        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    arguments: None,
                    additional_args: vec!["extra".to_string()],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(
            result.repos[0].hooks[0].args,
            Some(vec!["orig".to_string(), "extra".to_string()])
        );
    }

    #[test]
    fn additional_args_initialize_missing_argument_list() {
        let doc = document(vec![repo("https://example.com/a", &["check"])]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    additional_args: vec!["--fast".to_string()],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(
            result.repos[0].hooks[0].args,
            Some(vec!["--fast".to_string()])
        );
    }

    #[test]
    fn suppressing_only_hook_removes_repo() {
        let doc = document(vec![
            repo("https://example.com/a", &["solo"]),
            repo("https://example.com/b", &["keep"]),
        ]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                suppressed_hook_ids: vec!["solo".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(result.repos.len(), 1);
        assert_eq!(result.repos[0].repo, "https://example.com/b");
    }

    #[test]
    fn duplicate_suppressed_ids_are_tolerated() {
        let doc = document(vec![repo("https://example.com/a", &["one", "two"])]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                suppressed_hook_ids: vec![
                    "one".to_string(),
                    "one".to_string(),
                    "missing".to_string(),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(result.repos[0].hooks.len(), 1);
        assert_eq!(result.repos[0].hooks[0].id, "two");
    }

    #[test]
    fn repo_suppression_wins_over_hook_level_settings() {
        let doc = document(vec![repo("https://example.com/A", &["check"])]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    arguments: Some(vec!["ignored".to_string()]),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            // Case differs from the document on purpose.
            suppressed_repos: vec!["https://example.com/a".to_string()],
        };

        let result = apply_overrides(doc, &settings);
        assert!(result.repos.is_empty());
    }

    #[test]
    fn override_for_suppressed_hook_is_skipped() {
        let doc = document(vec![repo("https://example.com/a", &["gone", "stays"])]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                suppressed_hook_ids: vec!["gone".to_string()],
                hooks: vec![HookOverride {
                    id: "gone".to_string(),
                    arguments: Some(vec!["never-applied".to_string()]),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        assert_eq!(result.repos[0].hooks.len(), 1);
        assert_eq!(result.repos[0].hooks[0].id, "stays");
        assert_eq!(result.repos[0].hooks[0].args, None);
    }

    #[test]
    fn exclude_patterns_become_combined_regex() {
        let doc = document(vec![repo("https://example.com/a", &["check"])]);
        let settings = PreCommitSettings {
            repos: vec![RepoOverride {
                url: "https://example.com/a".to_string(),
                hooks: vec![HookOverride {
                    id: "check".to_string(),
                    exclude_file_patterns: vec!["*.min.js".to_string(), "vendor/".to_string()],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };

        let result = apply_overrides(doc, &settings);
        let exclude = result.repos[0].hooks[0].exclude.as_ref().unwrap();
        assert!(exclude.starts_with("^("));
        assert!(exclude.contains("ps_d0"));
        assert!(exclude.contains("ps_d1"));
    }
}
