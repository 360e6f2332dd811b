//! Pre-push hook: tools see the files changed by the commits being pushed

use super::FileSet;
use crate::git::GitOperations;
use anyhow::Result;

pub fn collect_files(git: &GitOperations) -> Result<FileSet> {
    Ok(FileSet::new(git.files_changed_since_upstream()?))
}
