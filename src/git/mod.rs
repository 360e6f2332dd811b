//! Git integration layer
//!
//! Repository discovery, the file sets the hooks work on, re-staging and
//! hook script management, all through git2.

pub mod commit;
mod operations;

use crate::hooks::HookKind;
use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// First line after the shebang of every script we install
pub const HOOK_MARKER: &str = "# Installed by booster-hooks";

/// Git operations handler
pub struct GitOperations {
    repo: Repository,
}

impl GitOperations {
    /// Open the repository containing `path`
    pub fn discover_from(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path.as_ref()).with_context(|| {
            format!("No Git repository found at {}", path.as_ref().display())
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a Git repository from the current directory
    pub fn discover() -> Result<Self> {
        Self::discover_from(".")
    }

    /// Working tree root; bare repositories are rejected
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    /// Get the current branch name, also before the first commit
    pub fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) => {
                let branch_name = head.shorthand().context("Failed to get branch name")?;
                Ok(branch_name.to_string())
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .context("Failed to get HEAD reference")?;
                let target = head.symbolic_target().context("HEAD is not symbolic")?;
                Ok(target.trim_start_matches("refs/heads/").to_string())
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }

    /// Directory git runs hooks from, honouring `core.hooksPath`
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let configured = self
            .repo
            .config()
            .ok()
            .and_then(|config| config.get_path("core.hooksPath").ok());

        match configured {
            Some(dir) if dir.is_absolute() => Ok(dir),
            Some(dir) => Ok(self.workdir()?.join(dir)),
            None => Ok(self.repo.path().join("hooks")),
        }
    }

    pub fn hook_path(&self, hook: HookKind) -> Result<PathBuf> {
        Ok(self.hooks_dir()?.join(hook.as_str()))
    }

    /// Install a git hook
    pub fn install_hook(&self, hook: HookKind, content: &str) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir()?;
        let hook_path = hooks_dir.join(hook.as_str());

        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;
        std::fs::write(&hook_path, content).context("Failed to write hook file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        Ok(hook_path)
    }

    /// Remove a git hook; returns whether a file was deleted
    pub fn remove_hook(&self, hook: HookKind) -> Result<bool> {
        let hook_path = self.hook_path(hook)?;
        if !hook_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&hook_path).context("Failed to remove hook file")?;
        Ok(true)
    }

    pub fn hook_exists(&self, hook: HookKind) -> bool {
        self.hook_path(hook).is_ok_and(|path| path.exists())
    }

    /// Whether the installed hook script is one of ours
    pub fn is_managed_hook(&self, hook: HookKind) -> bool {
        self.hook_path(hook)
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .is_some_and(|content| content.contains(HOOK_MARKER))
    }
}

/// Shell shim that hands a hook over to the runner
pub fn hook_script(hook: HookKind) -> String {
    format!(
        "#!/bin/sh\n{HOOK_MARKER}\nexec {} run {} \"$@\"\n",
        env!("CARGO_PKG_NAME"),
        hook.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, GitOperations) {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        let git = GitOperations::discover_from(dir.path()).unwrap();
        (dir, git)
    }

    #[test]
    fn test_hook_script_execs_runner() {
        let script = hook_script(HookKind::CommitMsg);
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains("booster-hooks run commit-msg \"$@\""));
    }

    #[test]
    fn test_current_branch_before_first_commit() {
        let (_dir, git) = init_repo();
        git.repo.set_head("refs/heads/feature/PRJ-42-login").unwrap();
        assert_eq!(git.current_branch().unwrap(), "feature/PRJ-42-login");
    }

    #[test]
    fn test_install_and_remove_hook() {
        let (_dir, git) = init_repo();

        assert!(!git.hook_exists(HookKind::PreCommit));
        let path = git.install_hook(HookKind::PreCommit, &hook_script(HookKind::PreCommit)).unwrap();
        assert!(path.ends_with("hooks/pre-commit"));
        assert!(git.hook_exists(HookKind::PreCommit));
        assert!(git.is_managed_hook(HookKind::PreCommit));

        assert!(git.remove_hook(HookKind::PreCommit).unwrap());
        assert!(!git.hook_exists(HookKind::PreCommit));
        assert!(!git.remove_hook(HookKind::PreCommit).unwrap());
    }

    #[test]
    fn test_foreign_hook_is_not_managed() {
        let (_dir, git) = init_repo();
        git.install_hook(HookKind::PrePush, "#!/bin/sh\nexit 0\n").unwrap();
        assert!(git.hook_exists(HookKind::PrePush));
        assert!(!git.is_managed_hook(HookKind::PrePush));
    }

    #[test]
    fn test_hooks_dir_honours_core_hooks_path() {
        let (dir, git) = init_repo();
        git.repo
            .config()
            .unwrap()
            .set_str("core.hooksPath", ".githooks")
            .unwrap();

        assert_eq!(git.hooks_dir().unwrap(), git.workdir().unwrap().join(".githooks"));
        git.install_hook(HookKind::PreCommit, "#!/bin/sh\n").unwrap();
        assert!(dir.path().join(".githooks/pre-commit").exists());
    }
}
