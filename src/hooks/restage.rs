//! Re-staging of files rewritten by auto-fixers

use super::FileSet;

/// Adds a path back to the pending change set (the git index)
pub trait Stager {
    fn stage(&self, path: &str) -> anyhow::Result<()>;
}

/// Stage every file; failures are logged and counted, never propagated.
pub fn restage(stager: &dyn Stager, tool: &str, files: &FileSet) -> usize {
    let mut failed = 0;
    for path in files {
        if let Err(e) = stager.stage(path) {
            tracing::warn!(tool, path = %path, error = %e, "failed to re-stage file");
            failed += 1;
        }
    }
    tracing::debug!(tool, files = files.len(), failed, "re-staged files");
    failed
}
