//! Refresh hook environments and pinned revisions.

use std::fs;

use anyhow::{Result, bail};

use crate::cli::Output;
use crate::config::hash_config;
use crate::git::GitRepo;
use crate::hooks::PreCommitRunner;
use crate::install::config_file_path;
use crate::install::store::InstallStateStore;
use crate::settings::Settings;

/// Execute the update command.
pub async fn execute(latest: bool, output: &Output) -> Result<()> {
    let root = GitRepo::discover(&std::env::current_dir()?)?.workdir()?;
    let settings = Settings::load(&root)?;
    let output = output.with_level(settings.echo.level);

    let config_path = config_file_path(&root);
    if !config_path.exists() {
        bail!("hooksmith has not been set up in this repository; run `hooksmith init` first");
    }

    let runner = PreCommitRunner::new(&root, settings.language_support.command_timeout_seconds);

    if latest {
        let result = runner.autoupdate(&[]).await?;
        output.print(result.output.trim_end());
        if !result.successful {
            bail!("updating hook revisions failed");
        }
    }

    let result = runner.install_hooks().await?;
    output.print(result.output.trim_end());
    if !result.successful {
        bail!("installing hook environments failed");
    }

    let gc = runner.garbage_collect().await?;
    output.verbose(gc.output.trim_end());

    // The autoupdate may have rewritten pinned revisions; re-fingerprint
    // the file so staleness detection stays accurate.
    let store = InstallStateStore::new(&root);
    let mut state = store.load()?;
    if state.is_installed() {
        let raw = fs::read_to_string(&config_path)?;
        state.version_installed = Some(hash_config(&raw));
        store.save(&state)?;
    }

    output.success("Hook repositories are up to date.");
    Ok(())
}
