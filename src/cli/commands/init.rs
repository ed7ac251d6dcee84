//! Set up hooksmith in the current repository.

use anyhow::{Result, bail};

use crate::cli::Output;
use crate::config::templates::TemplateStore;
use crate::git::GitRepo;
use crate::install::{Installer, VerifyOutcome};
use crate::language::LanguageAnalyzer;
use crate::settings::Settings;

/// Execute the init command.
pub async fn execute(reset: bool, yes: bool, output: &Output) -> Result<()> {
    let root = GitRepo::discover(&std::env::current_dir()?)?.workdir()?;
    let settings = Settings::load(&root)?;
    let output = output.with_level(settings.echo.level);

    let analyzer = LanguageAnalyzer::new(&settings.repo_files);
    let detected = analyzer.analyze(&root)?;
    for skipped in &detected.skipped_files {
        output.warning(&format!("Skipping file: {}", skipped.error_message));
    }

    let templates = TemplateStore::vendored();
    let installer = Installer::new(&root, &templates, &settings, &output, &output);
    let result = installer.verify_install(&detected, reset, yes)?;

    match result.outcome {
        VerifyOutcome::InstallSucceeded
        | VerifyOutcome::UpdateSucceeded
        | VerifyOutcome::UpToDate => Ok(()),
        VerifyOutcome::InstallCanceled | VerifyOutcome::UpdateCanceled => {
            output.warning(&format!("Nothing was changed ({})", result.outcome));
            Ok(())
        }
        VerifyOutcome::InstallFailed | VerifyOutcome::UpdateFailed => {
            bail!("setup did not complete ({})", result.outcome)
        }
    }
}
