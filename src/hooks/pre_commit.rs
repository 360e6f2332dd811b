//! Pre-commit hook: tools see the staged files

use super::FileSet;
use crate::git::GitOperations;
use anyhow::Result;

/// Staged paths, deletions excluded
pub fn collect_files(git: &GitOperations) -> Result<FileSet> {
    let files = FileSet::new(git.staged_files()?);
    if files.is_empty() {
        tracing::info!("no staged files");
    }
    Ok(files)
}
