//! Git repository access.
//!
//! Thin wrapper over `git2` for the two things the scanners and the
//! installer need: finding the repository root and enumerating staged
//! files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Repository, Status, StatusOptions};

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discover the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("no git repository found at {}", path.display()))?;
        Ok(Self { repo })
    }

    /// Root of the working tree.
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .context("repository has no working directory")
    }

    /// Files currently staged for commit, as absolute paths.
    pub fn staged_files(&self) -> Result<Vec<PathBuf>> {
        let mut status_opts = StatusOptions::new();
        status_opts.include_ignored(false);
        status_opts.include_untracked(false);

        let statuses = self.repo.statuses(Some(&mut status_opts))?;
        let workdir = self.workdir()?;

        let mut files = Vec::new();
        for entry in statuses.iter() {
            let staged = entry.status().intersects(
                Status::INDEX_NEW
                    | Status::INDEX_MODIFIED
                    | Status::INDEX_RENAMED
                    | Status::INDEX_TYPECHANGE,
            );
            if staged {
                if let Some(path) = entry.path() {
                    let absolute = workdir.join(path);
                    if absolute.is_file() {
                        files.push(absolute);
                    }
                }
            }
        }

        files.sort();
        Ok(files)
    }
}
