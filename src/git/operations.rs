use super::GitOperations;
use crate::hooks::Stager;
use anyhow::{Context, Result};
use git2::{Branch, Delta, DiffOptions, Status, StatusOptions};
use std::path::Path;

impl GitOperations {
    /// Paths staged for the next commit, repository-relative. Deletions are
    /// left out since there is nothing left for a tool to look at.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to get repository status")?;

        let staged = Status::INDEX_NEW
            | Status::INDEX_MODIFIED
            | Status::INDEX_RENAMED
            | Status::INDEX_TYPECHANGE;

        let mut files = Vec::new();
        for entry in statuses.iter() {
            if !entry.status().intersects(staged) {
                continue;
            }
            let path = entry
                .head_to_index()
                .and_then(|delta| delta.new_file().path().map(Path::to_path_buf))
                .or_else(|| entry.path().map(Into::into));
            if let Some(path) = path {
                files.push(path.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(files)
    }

    /// Paths changed by the commits that a push would publish: everything
    /// between the merge base with the upstream branch and `HEAD`. Empty when
    /// the current branch tracks nothing.
    pub fn files_changed_since_upstream(&self) -> Result<Vec<String>> {
        let head = match self.repo.head() {
            Ok(head) if head.is_branch() => head,
            _ => return Ok(Vec::new()),
        };
        let head_commit = head.peel_to_commit().context("HEAD is not a commit")?;

        let upstream = match Branch::wrap(head).upstream() {
            Ok(upstream) => upstream,
            Err(_) => {
                tracing::debug!("current branch has no upstream");
                return Ok(Vec::new());
            }
        };
        let upstream_oid = upstream
            .get()
            .target()
            .context("Upstream branch has no target")?;

        let base_oid = self
            .repo
            .merge_base(upstream_oid, head_commit.id())
            .context("Failed to find merge base with upstream")?;
        let base_tree = self.repo.find_commit(base_oid)?.tree()?;
        let head_tree = head_commit.tree()?;

        let mut diff_opts = DiffOptions::new();
        diff_opts.context_lines(0);
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut diff_opts))
            .context("Failed to diff against upstream")?;

        let files = diff
            .deltas()
            .filter(|delta| delta.status() != Delta::Deleted)
            .filter_map(|delta| delta.new_file().path())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect();
        Ok(files)
    }
}

impl Stager for GitOperations {
    fn stage(&self, path: &str) -> Result<()> {
        let mut index = self.repo.index().context("Failed to open index")?;
        let relative = Path::new(path);

        if self.workdir()?.join(relative).exists() {
            index
                .add_path(relative)
                .with_context(|| format!("Failed to stage {path}"))?;
        } else {
            index
                .remove_path(relative)
                .with_context(|| format!("Failed to unstage {path}"))?;
        }
        index.write().context("Failed to write index")?;
        Ok(())
    }
}
