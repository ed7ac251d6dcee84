//! Merging per-language templates into one hook configuration.
//!
//! The synthesizer walks the detected languages (plus the implicit
//! `base` language whose hooks apply everywhere), loads each template,
//! applies the user's overrides and appends the surviving repos to a
//! single document, which is then serialized and content-hashed into a
//! version fingerprint.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::settings::Settings;
use crate::shared::patterns::{combine_patterns, glob_to_regex};

use super::document::ConfigDocument;
use super::hash::hash_config;
use super::overrides::apply_overrides;
use super::templates::{LinterConfigBundle, TemplateError, TemplateStore};

/// Language processed for every repository regardless of detection.
pub const BASE_LANGUAGE: &str = "base";

/// The synthesized configuration for a single language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguagePreCommitResult {
    pub language: String,
    /// Serialized [`ConfigDocument`] for this language alone.
    pub config_data: String,
    /// Content hash of `config_data`.
    pub version: String,
    pub linter_config: Option<LinterConfigBundle>,
}

/// The aggregate result of one synthesis pass over all languages.
#[derive(Debug, Clone, Serialize)]
pub struct BuildConfigResult {
    /// True iff at least one repo survived merging across all languages.
    pub successful: bool,
    /// Languages whose template loaded, in processing order.
    pub languages_added: Vec<String>,
    pub config_data: ConfigDocument,
    /// Content hash of the serialized merged document.
    pub version: String,
    pub linter_configs: Vec<LinterConfigBundle>,
}

impl BuildConfigResult {
    fn failed() -> Self {
        Self {
            successful: false,
            languages_added: Vec::new(),
            config_data: ConfigDocument::default(),
            version: String::new(),
            linter_configs: Vec::new(),
        }
    }
}

/// Builds hook configurations from templates, settings and (optionally)
/// an existing on-disk configuration.
pub struct ConfigSynthesizer<'a> {
    templates: &'a TemplateStore,
    settings: &'a Settings,
}

impl<'a> ConfigSynthesizer<'a> {
    pub fn new(templates: &'a TemplateStore, settings: &'a Settings) -> Self {
        Self {
            templates,
            settings,
        }
    }

    /// Synthesize the configuration for one language.
    pub fn language_config(
        &self,
        language: &str,
        include_lint: bool,
    ) -> Result<LanguagePreCommitResult, TemplateError> {
        let document = self.combined_document(language, include_lint)?;
        let config_data = document
            .to_yaml()
            .map_err(|source| TemplateError::Malformed {
                name: language.to_string(),
                source,
            })?;
        let version = hash_config(&config_data);
        let linter_config = if include_lint {
            self.templates.linter_config(language)?
        } else {
            None
        };

        Ok(LanguagePreCommitResult {
            language: language.to_string(),
            config_data,
            version,
            linter_config,
        })
    }

    /// Merge templates across all `languages` (plus the implicit base
    /// language) into one configuration document.
    ///
    /// When `existing_config` names a file that exists, its repos seed the
    /// merged list and its other top-level keys are preserved; a file that
    /// fails to parse aborts the whole build (`successful == false`,
    /// empty document) rather than producing partial output.
    ///
    /// A language whose template is missing is skipped and left out of
    /// `languages_added`; one unsupported language among many never
    /// aborts the build.
    pub fn build_config(
        &self,
        languages: &[String],
        lint_languages: &[String],
        existing_config: Option<&Path>,
    ) -> BuildConfigResult {
        let mut config_languages: Vec<String> = languages.to_vec();
        config_languages.push(BASE_LANGUAGE.to_string());
        let mut config_lint_languages: Vec<String> = lint_languages.to_vec();
        config_lint_languages.push(BASE_LANGUAGE.to_string());

        let mut merged = ConfigDocument::default();
        if let Some(path) = existing_config {
            match fs::read_to_string(path) {
                Ok(raw) => match ConfigDocument::parse(&raw) {
                    Ok(existing) => merged = existing,
                    Err(err) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %err,
                            "existing hook configuration failed to parse"
                        );
                        return BuildConfigResult::failed();
                    }
                },
                Err(err) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %err,
                        "existing hook configuration could not be read"
                    );
                    return BuildConfigResult::failed();
                }
            }
        }

        let mut languages_added = Vec::new();
        let mut linter_configs = Vec::new();

        for language in &config_languages {
            let include_lint = config_lint_languages.contains(language);
            match self.language_config(language, include_lint) {
                Ok(result) => {
                    languages_added.push(language.clone());
                    if let Some(bundle) = result.linter_config {
                        linter_configs.push(bundle);
                    }
                    match ConfigDocument::parse(&result.config_data) {
                        Ok(document) => merged.repos.extend(document.repos),
                        Err(err) => {
                            tracing::warn!(language = %language, error = %err, "skipping unreadable language config");
                            languages_added.pop();
                        }
                    }
                }
                Err(TemplateError::LanguageNotSupported(name)) => {
                    tracing::debug!(language = %name, "no template for language, skipping");
                }
                Err(err) => {
                    tracing::warn!(language = %language, error = %err, "language template failed to load, skipping");
                }
            }
        }

        if merged.exclude.is_none() {
            merged.exclude = self.settings_exclude();
        }

        let serialized = match merged.to_yaml() {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!(error = %err, "merged configuration failed to serialize");
                return BuildConfigResult::failed();
            }
        };

        BuildConfigResult {
            successful: !merged.repos.is_empty(),
            languages_added,
            version: hash_config(&serialized),
            config_data: merged,
            linter_configs,
        }
    }

    /// Find a hook ID usable for secrets detection among the given
    /// languages' configured repos, if any.
    pub fn secret_detection_hook_id(&self, languages: &[String]) -> Option<String> {
        let config = self.build_config(languages, &[], None).config_data;
        let secrets_repos = match self.templates.secrets_detecting_repos() {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(error = %err, "secrets-detecting repo map failed to load");
                return None;
            }
        };

        for repo in &config.repos {
            let Some(known_hooks) = secrets_repos.get(&repo.repo.to_lowercase()) else {
                continue;
            };
            // Having the repo is not enough; the hook itself must be
            // configured.
            for hook in &repo.hooks {
                if known_hooks.contains(&hook.id) {
                    return Some(hook.id.clone());
                }
            }
        }
        None
    }

    fn combined_document(
        &self,
        language: &str,
        include_lint: bool,
    ) -> Result<ConfigDocument, TemplateError> {
        let document = self.templates.load_language(language, include_lint)?;
        let mut document = apply_overrides(document, &self.settings.pre_commit);
        if document.exclude.is_none() {
            document.exclude = self.settings_exclude();
        }
        Ok(document)
    }

    fn settings_exclude(&self) -> Option<String> {
        let fragments: Vec<String> = self
            .settings
            .repo_files
            .exclude_file_patterns
            .iter()
            .map(|pattern| glob_to_regex(pattern))
            .collect();
        combine_patterns(&fragments)
    }
}
