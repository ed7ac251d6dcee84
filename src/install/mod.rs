//! Install/verify state machine.
//!
//! Given the previously persisted install state and the freshly detected
//! languages, this module decides whether to no-op, install from scratch,
//! add languages to an existing install, or migrate a stale on-disk
//! schema. Confirmation prompts go through the [`Prompter`] trait so the
//! decision points stay scriptable in tests.

pub mod gitignore;
pub mod store;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use crate::cli::Output;
use crate::config::synthesis::{BuildConfigResult, ConfigSynthesizer};
use crate::config::templates::TemplateStore;
use crate::language::AnalyzeResult;
use crate::settings::Settings;

use gitignore::ignore_hooksmith_files;
use store::{InstallStateStore, PersistedInstallState, SchemaStatus, STATE_DIR};

/// File name of the generated hook configuration.
pub const CONFIG_FILE_NAME: &str = ".pre-commit-config.yaml";

/// The single outcome every invocation of the state machine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    InstallSucceeded,
    InstallCanceled,
    InstallFailed,
    UpdateSucceeded,
    UpdateCanceled,
    UpdateFailed,
    UpToDate,
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerifyOutcome::InstallSucceeded => "install-succeeded",
            VerifyOutcome::InstallCanceled => "install-canceled",
            VerifyOutcome::InstallFailed => "install-failed",
            VerifyOutcome::UpdateSucceeded => "update-succeeded",
            VerifyOutcome::UpdateCanceled => "update-canceled",
            VerifyOutcome::UpdateFailed => "update-failed",
            VerifyOutcome::UpToDate => "up-to-date",
        };
        f.write_str(label)
    }
}

/// Result of running the state machine once.
#[derive(Debug, Clone)]
pub struct VerifyResult {
    pub outcome: VerifyOutcome,
    pub state: Option<PersistedInstallState>,
}

impl VerifyResult {
    fn outcome(outcome: VerifyOutcome) -> Self {
        Self {
            outcome,
            state: None,
        }
    }

    fn with_state(outcome: VerifyOutcome, state: PersistedInstallState) -> Self {
        Self {
            outcome,
            state: Some(state),
        }
    }
}

/// Collects yes/no answers from the user.
pub trait Prompter {
    fn confirm(&self, message: &str, default_yes: bool) -> bool;
}

/// Path the generated hook configuration is written to.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join(CONFIG_FILE_NAME)
}

/// Drives install/verify for one repository.
pub struct Installer<'a> {
    root: &'a Path,
    templates: &'a TemplateStore,
    settings: &'a Settings,
    store: InstallStateStore,
    output: &'a Output,
    prompter: &'a dyn Prompter,
}

impl<'a> Installer<'a> {
    pub fn new(
        root: &'a Path,
        templates: &'a TemplateStore,
        settings: &'a Settings,
        output: &'a Output,
        prompter: &'a dyn Prompter,
    ) -> Self {
        Self {
            root,
            templates,
            settings,
            store: InstallStateStore::new(root),
            output,
            prompter,
        }
    }

    /// Install, upgrade or verify the current hooksmith installation.
    ///
    /// Re-entrant: two consecutive runs with no repository changes in
    /// between yield `UP_TO_DATE` twice, and the second run never writes
    /// persisted state.
    pub fn verify_install(
        &self,
        detected: &AnalyzeResult,
        reset: bool,
        always_yes: bool,
    ) -> Result<VerifyResult> {
        if !reset && self.store.verify()? == SchemaStatus::OutOfDate {
            if let Some(early) = self.migrate_state(always_yes)? {
                return Ok(early);
            }
        }

        let state = if reset {
            PersistedInstallState::default()
        } else {
            self.store.load()?
        };
        let detected_languages = detected.languages();

        if !state.is_installed() {
            return self.install_fresh(&detected_languages, always_yes);
        }

        let installed = state.languages.clone().unwrap_or_default();
        let new_languages: Vec<String> = detected_languages
            .iter()
            .filter(|language| !installed.contains(language))
            .cloned()
            .collect();

        if new_languages.is_empty() {
            tracing::debug!(?installed, "no new languages detected");
            self.output.print(&format!(
                "hooksmith is installed and up to date (languages = {})",
                installed.join(", ")
            ));
            return Ok(VerifyResult::with_state(VerifyOutcome::UpToDate, state));
        }

        self.add_languages(state, &new_languages, always_yes)
    }

    /// Handle the deprecated-schema state file. Returns an early result
    /// for the canceled/failed arms; `None` means migration succeeded and
    /// verification should continue.
    fn migrate_state(&self, always_yes: bool) -> Result<Option<VerifyResult>> {
        self.output
            .warning("The stored hooksmith configuration uses a deprecated layout.");
        let confirmed = always_yes
            || self
                .prompter
                .confirm("Update the stored configuration to the current format?", true);
        if !confirmed {
            self.output.warning("Configuration update declined.");
            return Ok(Some(VerifyResult::outcome(VerifyOutcome::UpdateCanceled)));
        }

        match self.store.migrate() {
            Ok(migrated) => {
                self.store.save(&migrated)?;
                self.output.success("Stored configuration updated.");
                Ok(None)
            }
            Err(err) => {
                self.output.error(&format!(
                    "The stored configuration could not be updated: {err}"
                ));
                Ok(Some(VerifyResult::outcome(VerifyOutcome::UpdateFailed)))
            }
        }
    }

    fn install_fresh(&self, detected: &[String], always_yes: bool) -> Result<VerifyResult> {
        let supported = self.supported_languages(detected);
        if supported.is_empty() {
            self.output
                .error("No supported languages were detected in this repository.");
            return Ok(VerifyResult::outcome(VerifyOutcome::InstallFailed));
        }

        self.output
            .print("hooksmith has not been set up in this repository yet.");
        let confirmed = always_yes || self.prompter.confirm("Set up hooksmith now?", true);
        if !confirmed {
            self.output.warning("Setup canceled.");
            return Ok(VerifyResult::outcome(VerifyOutcome::InstallCanceled));
        }

        self.output.print("Detected languages:");
        for language in &supported {
            self.output.list_item(language);
        }

        let synthesizer = ConfigSynthesizer::new(self.templates, self.settings);
        let seed = self.seed_config_path();
        let result = synthesizer.build_config(&supported, &supported, seed.as_deref());
        if !result.successful {
            self.output
                .error("Hook configuration could not be assembled; nothing was installed.");
            return Ok(VerifyResult::outcome(VerifyOutcome::InstallFailed));
        }

        self.apply_support(&result)?;
        let state = PersistedInstallState {
            languages: Some(supported.clone()),
            version_installed: Some(result.version.clone()),
        };
        self.store.save(&state)?;

        match synthesizer.secret_detection_hook_id(&supported) {
            Some(hook_id) => self
                .output
                .print(&format!("Secrets detection is available via {hook_id}.")),
            None => self
                .output
                .warning("None of the configured hooks support secrets detection."),
        }
        self.output.success(&format!(
            "hooksmith has been installed successfully (languages = {})",
            supported.join(", ")
        ));

        Ok(VerifyResult::with_state(
            VerifyOutcome::InstallSucceeded,
            state,
        ))
    }

    fn add_languages(
        &self,
        state: PersistedInstallState,
        new_languages: &[String],
        always_yes: bool,
    ) -> Result<VerifyResult> {
        let supported_new = self.supported_languages(new_languages);
        if supported_new.is_empty() {
            self.output.warning(
                "Newly detected languages are not supported; the existing configuration stands.",
            );
            return Ok(VerifyResult::with_state(VerifyOutcome::UpToDate, state));
        }

        let accepted: Vec<String> = if always_yes {
            supported_new
        } else {
            supported_new
                .into_iter()
                .filter(|language| {
                    self.prompter.confirm(
                        &format!("Detected a new language: {language}. Add hooks for it?"),
                        true,
                    )
                })
                .collect()
        };
        if accepted.is_empty() {
            self.output
                .warning("No new languages were added; the existing configuration stands.");
            return Ok(VerifyResult::with_state(VerifyOutcome::UpToDate, state));
        }

        let mut union = state.languages.clone().unwrap_or_default();
        union.extend(accepted);

        let synthesizer = ConfigSynthesizer::new(self.templates, self.settings);
        let seed = self.seed_config_path();
        let result = synthesizer.build_config(&union, &union, seed.as_deref());
        if !result.successful {
            self.output
                .error("Hook configuration could not be assembled; nothing was changed.");
            return Ok(VerifyResult::outcome(VerifyOutcome::InstallFailed));
        }

        self.apply_support(&result)?;
        let new_state = PersistedInstallState {
            languages: Some(union.clone()),
            version_installed: Some(result.version.clone()),
        };
        self.store.save(&new_state)?;
        self.output.success(&format!(
            "Hook configuration now covers: {}",
            union.join(", ")
        ));

        Ok(VerifyResult::with_state(
            VerifyOutcome::InstallSucceeded,
            new_state,
        ))
    }

    /// Hook configuration a user accumulated before adopting hooksmith,
    /// used to seed the merge. The generated file under `.hooksmith/` is
    /// never a seed: it is rebuilt from templates on every install, and
    /// seeding from it would duplicate its repos.
    fn seed_config_path(&self) -> Option<PathBuf> {
        let legacy = self.root.join(CONFIG_FILE_NAME);
        legacy.is_file().then_some(legacy)
    }

    /// Split detected languages into the supported subset, warning about
    /// the rest.
    fn supported_languages(&self, detected: &[String]) -> Vec<String> {
        let mut supported = Vec::with_capacity(detected.len());
        for language in detected {
            if self.templates.supports(language) {
                supported.push(language.clone());
            } else {
                self.output
                    .warning(&format!("Language not yet supported: {language}"));
            }
        }
        supported
    }

    /// Write everything a successful synthesis produces: the merged hook
    /// configuration, linter side-configs, the gitignore block and the
    /// git pre-commit script.
    fn apply_support(&self, result: &BuildConfigResult) -> Result<()> {
        let state_dir = self.root.join(STATE_DIR);
        fs::create_dir_all(&state_dir)
            .with_context(|| format!("failed to create {}", state_dir.display()))?;

        let serialized = result.config_data.to_yaml()?;
        let config_path = config_file_path(self.root);
        fs::write(&config_path, serialized)
            .with_context(|| format!("failed to write {}", config_path.display()))?;

        for bundle in &result.linter_configs {
            for file in &bundle.files {
                let path = state_dir.join(&file.filename);
                let write_result = serde_yml::to_string(&file.settings)
                    .map_err(anyhow::Error::from)
                    .and_then(|contents| fs::write(&path, contents).map_err(Into::into));
                if let Err(err) = write_result {
                    tracing::warn!(error = %err, filename = %file.filename, "linter config write failed");
                    self.output.warning(&format!(
                        "Failed to write {} linter config file for {}",
                        file.filename, bundle.language
                    ));
                }
            }
        }

        ignore_hooksmith_files(self.root)?;
        self.install_hook_script()?;
        Ok(())
    }

    /// Install the `.git/hooks/pre-commit` script, backing up any
    /// pre-existing hook.
    fn install_hook_script(&self) -> Result<()> {
        if !self.root.join(".git").exists() {
            tracing::debug!("not a git repository, skipping hook script install");
            return Ok(());
        }
        let hooks_dir = self.root.join(".git").join("hooks");
        fs::create_dir_all(&hooks_dir)?;

        let hook_path = hooks_dir.join("pre-commit");
        if hook_path.is_file() {
            let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
            let backup = hooks_dir.join(format!("pre-commit.backup.{timestamp}"));
            fs::copy(&hook_path, &backup)?;
            self.output.warning(&format!(
                "Existing pre-commit hook backed up to {}",
                backup.display()
            ));
        }

        fs::write(&hook_path, "#!/bin/sh\n# Installed by hooksmith\nhooksmith scan\n")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut permissions = fs::metadata(&hook_path)?.permissions();
            permissions.set_mode(permissions.mode() | 0o111);
            fs::set_permissions(&hook_path, permissions)?;
        }
        Ok(())
    }
}
