//! Invocation of the external `pre-commit` executable.
//!
//! The heavy lifting of fetching hook repositories and running their
//! hooks belongs to the pre-commit tool itself; this module only builds
//! the command lines, points them at the generated configuration and
//! enforces the configured timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tokio::process::Command;

use crate::install::config_file_path;

const PRE_COMMIT_BIN: &str = "pre-commit";

/// The result of invoking the hook runner.
#[derive(Debug, Clone)]
pub struct ExecuteResult {
    pub successful: bool,
    pub output: String,
}

/// Runs `pre-commit` against the repository's generated configuration.
pub struct PreCommitRunner {
    root: PathBuf,
    timeout: Duration,
}

impl PreCommitRunner {
    pub fn new(root: &Path, command_timeout_seconds: u64) -> Self {
        Self {
            root: root.to_path_buf(),
            timeout: Duration::from_secs(command_timeout_seconds),
        }
    }

    /// Whether the pre-commit executable is on the PATH.
    pub fn is_available() -> bool {
        which::which(PRE_COMMIT_BIN).is_ok()
    }

    /// Run the configured hooks against staged changes or the whole
    /// repository.
    pub async fn run_hooks(
        &self,
        all_files: bool,
        hook_id: Option<&str>,
    ) -> Result<ExecuteResult> {
        let mut args: Vec<String> = vec![
            "run".to_string(),
            "--config".to_string(),
            self.config_path_arg(),
            "--color".to_string(),
            "always".to_string(),
        ];
        if all_files {
            args.push("--all-files".to_string());
        }
        if let Some(hook_id) = hook_id {
            args.push(hook_id.to_string());
        }
        self.invoke(&args).await
    }

    /// Install the hook environments defined in the configuration.
    pub async fn install_hooks(&self) -> Result<ExecuteResult> {
        self.invoke(&[
            "install-hooks".to_string(),
            "--config".to_string(),
            self.config_path_arg(),
            "--color".to_string(),
            "always".to_string(),
        ])
        .await
    }

    /// Bump pinned hook revisions to their latest releases.
    pub async fn autoupdate(&self, repos: &[String]) -> Result<ExecuteResult> {
        let mut args = vec![
            "autoupdate".to_string(),
            "--config".to_string(),
            self.config_path_arg(),
        ];
        for repo in repos {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }
        self.invoke(&args).await
    }

    /// Drop cached hook repositories the configuration no longer uses.
    pub async fn garbage_collect(&self) -> Result<ExecuteResult> {
        self.invoke(&["gc".to_string(), "--color".to_string(), "always".to_string()])
            .await
    }

    fn config_path_arg(&self) -> String {
        config_file_path(&self.root).display().to_string()
    }

    async fn invoke(&self, args: &[String]) -> Result<ExecuteResult> {
        if !Self::is_available() {
            bail!("the '{PRE_COMMIT_BIN}' executable was not found on PATH");
        }
        tracing::debug!(?args, "invoking pre-commit");

        let child = Command::new(PRE_COMMIT_BIN)
            .args(args)
            .current_dir(&self.root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {PRE_COMMIT_BIN}"))?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;
        let output = match result {
            Ok(output) => output?,
            Err(_) => bail!(
                "{PRE_COMMIT_BIN} did not finish within {} seconds",
                self.timeout.as_secs()
            ),
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ExecuteResult {
            successful: output.status.success(),
            output: combined,
        })
    }
}
