//! Managed `.gitignore` block.
//!
//! Hooksmith keeps its working directory out of version control through a
//! marker-delimited block it owns inside the repository's `.gitignore`.
//! Everything outside the markers belongs to the user and is never
//! touched. A header with no matching footer means the file was edited by
//! hand in a way we cannot safely repair; that is surfaced as an error
//! for the user to fix manually.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::store::STATE_DIR;

const HEADER: &str = "# Managed by hooksmith - do not edit this block";
const FOOTER: &str = "# End of hooksmith managed block";

#[derive(Debug, Error)]
pub enum IgnoreBlockError {
    #[error(
        "the hooksmith block in .gitignore has a header but no footer; \
         please repair the file manually"
    )]
    MissingFooter,

    #[error("unable to update .gitignore: {0}")]
    Io(#[from] std::io::Error),
}

/// Ensure the repository's `.gitignore` excludes hooksmith's files.
pub fn ignore_hooksmith_files(root: &Path) -> Result<(), IgnoreBlockError> {
    let path = root.join(".gitignore");
    let block = format!("{HEADER}\n{STATE_DIR}/\n{FOOTER}\n");

    if !path.exists() {
        fs::write(&path, &block)?;
        return Ok(());
    }

    let contents = fs::read_to_string(&path)?;
    let updated = match (contents.find(HEADER), contents.find(FOOTER)) {
        (Some(start), Some(end)) => {
            let after_footer = end + FOOTER.len();
            let tail = contents[after_footer..].trim_start_matches('\n');
            format!("{}{}{}", &contents[..start], block, tail)
        }
        (Some(_), None) => return Err(IgnoreBlockError::MissingFooter),
        _ => {
            let mut updated = contents.clone();
            if !updated.is_empty() && !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&block);
            updated
        }
    };

    if updated != contents {
        fs::write(&path, updated)?;
    }
    Ok(())
}
