use super::{ExecOutput, Executor, Program};
use crate::context::RunContext;
use crate::error::ExecError;
use crate::tools::LocationClass;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs tools on the host, with the repository root as working directory
pub struct DirectExecutor {
    root: PathBuf,
    search_path: Option<OsString>,
}

impl DirectExecutor {
    pub fn new(context: &RunContext) -> Self {
        Self {
            root: context.root().to_path_buf(),
            search_path: context.search_path(),
        }
    }
}

/// Resolve a binary for `location` under `root`.
///
/// Dependency-bin classes only look in their own directory so a globally
/// installed copy never shadows the project's pinned version.
pub(super) fn resolve_in(
    root: &Path,
    search_path: Option<&OsString>,
    command: &str,
    location: LocationClass,
) -> Option<PathBuf> {
    match location.bin_dir() {
        Some(dir) => which::which_in(command, Some(root.join(dir)), root).ok(),
        None => which::which_in(command, search_path, root).ok(),
    }
}

/// `vendor/bin/phpstan` for project binaries, the bare name for system ones
pub(super) fn display_name(root: &Path, path: &Path, command: &str) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
        Err(_) => command.to_string(),
    }
}

impl Executor for DirectExecutor {
    fn name(&self) -> &'static str {
        "host"
    }

    fn resolve(&self, command: &str, location: LocationClass) -> Option<Program> {
        let path = resolve_in(&self.root, self.search_path.as_ref(), command, location)?;
        let display = display_name(&self.root, &path, command);
        Some(Program::new(path, display))
    }

    fn run(&self, program: &Program, args: &[String]) -> Result<ExecOutput, ExecError> {
        let output = Command::new(program.path())
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        Ok(output.into())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, relative: &str, body: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn executor(root: &Path, path: &str) -> DirectExecutor {
        DirectExecutor::new(&RunContext::new(root, [("PATH", path)]))
    }

    #[test]
    fn test_resolves_project_binaries_only_in_their_dir() {
        let dir = TempDir::new().unwrap();
        script(dir.path(), "vendor/bin/phpstan", "exit 0");
        script(dir.path(), "node_modules/.bin/eslint", "exit 0");

        let exec = executor(dir.path(), "/nonexistent");
        let phpstan = exec.resolve("phpstan", LocationClass::ProjectDependencyBin).unwrap();
        assert_eq!(phpstan.display(), "vendor/bin/phpstan");

        assert!(exec.resolve("phpstan", LocationClass::LocalDependencyBin).is_none());
        assert!(exec.resolve("eslint", LocationClass::LocalDependencyBin).is_some());
    }

    #[test]
    fn test_system_binaries_use_captured_path() {
        let dir = TempDir::new().unwrap();
        script(dir.path(), "tools/lintme", "exit 0");
        let tools = dir.path().join("tools");

        let exec = executor(dir.path(), tools.to_str().unwrap());
        assert!(exec.resolve("lintme", LocationClass::SystemPath).is_some());
        assert!(exec.resolve("missing-tool", LocationClass::SystemPath).is_none());
    }

    #[test]
    fn test_run_captures_output_and_status() {
        let dir = TempDir::new().unwrap();
        script(dir.path(), "vendor/bin/check", "echo \"checked $1\"; echo bad >&2; exit 3");

        let exec = executor(dir.path(), "/nonexistent");
        let program = exec.resolve("check", LocationClass::ProjectDependencyBin).unwrap();
        let output = exec.run(&program, &["a.php".to_string()]).unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "checked a.php\n");
        assert_eq!(output.stderr, "bad\n");
    }

    #[test]
    fn test_run_uses_repository_root_as_cwd() {
        let dir = TempDir::new().unwrap();
        script(dir.path(), "vendor/bin/where", "pwd");

        let exec = executor(dir.path(), "/nonexistent");
        let program = exec.resolve("where", LocationClass::ProjectDependencyBin).unwrap();
        let output = exec.run(&program, &[]).unwrap();

        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(output.stdout.trim()).canonicalize().unwrap(), expected);
    }
}
