//! Running external tool binaries
//!
//! The engine never spawns processes itself. It talks to an [`Executor`],
//! chosen once per run: [`DirectExecutor`] runs binaries on the host,
//! [`SandboxedExecutor`] routes them through `ddev exec` into the project's
//! DDEV web container.

mod direct;
mod sandbox;

pub use direct::DirectExecutor;
pub use sandbox::{SandboxedExecutor, shell_quote};

use crate::context::RunContext;
use crate::error::ExecError;
use crate::tools::LocationClass;
use std::path::{Path, PathBuf};

/// A resolved tool binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    path: PathBuf,
    display: String,
}

impl Program {
    pub fn new(path: impl Into<PathBuf>, display: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            display: display.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short form for messages (`vendor/bin/phpstan`, `php`)
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// Captured result of one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            text.push('\n');
        }
        text.push_str(&self.stderr);
        text
    }
}

impl From<std::process::Output> for ExecOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Where and how tool binaries run
pub trait Executor {
    fn name(&self) -> &'static str;

    /// Locate `command` for the given location class, or `None` if absent
    fn resolve(&self, command: &str, location: LocationClass) -> Option<Program>;

    /// Run to completion and capture the output. A non-zero exit is a
    /// successful call with `success == false`.
    fn run(&self, program: &Program, args: &[String]) -> Result<ExecOutput, ExecError>;
}

/// Marker file of a DDEV project
pub const DDEV_CONFIG: &str = ".ddev/config.yaml";

/// Whether the run should go through DDEV, given whether the `ddev` binary is
/// available on the host.
pub fn sandbox_wanted(context: &RunContext, ddev_available: bool) -> bool {
    !context.in_container()
        && !context.sandbox_disabled()
        && context.root().join(DDEV_CONFIG).is_file()
        && ddev_available
}

/// Pick the executor for this run
pub fn select_executor(context: &RunContext) -> Box<dyn Executor> {
    let ddev = which::which_in("ddev", context.search_path(), context.root()).ok();

    match ddev {
        Some(ddev) if sandbox_wanted(context, true) => {
            tracing::info!(ddev = %ddev.display(), "running tools inside the DDEV container");
            Box::new(SandboxedExecutor::new(context, ddev))
        }
        _ => {
            tracing::debug!("running tools on the host");
            Box::new(DirectExecutor::new(context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ddev_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".ddev")).unwrap();
        fs::write(dir.path().join(DDEV_CONFIG), "name: demo\n").unwrap();
        dir
    }

    #[test]
    fn test_sandbox_needs_ddev_project() {
        let dir = TempDir::new().unwrap();
        let context = RunContext::new(dir.path(), Vec::<(String, String)>::new());
        assert!(!sandbox_wanted(&context, true));
    }

    #[test]
    fn test_sandbox_selected_for_ddev_project() {
        let dir = ddev_project();
        let context = RunContext::new(dir.path(), Vec::<(String, String)>::new());
        assert!(sandbox_wanted(&context, true));
        assert!(!sandbox_wanted(&context, false));
    }

    #[test]
    fn test_no_sandbox_inside_container() {
        let dir = ddev_project();
        let context = RunContext::new(dir.path(), [("IS_DDEV_PROJECT", "true")]);
        assert!(!sandbox_wanted(&context, true));
    }

    #[test]
    fn test_sandbox_can_be_disabled() {
        let dir = ddev_project();
        let context = RunContext::new(dir.path(), [("GIT_HOOKS_NO_SANDBOX", "1")]);
        assert!(!sandbox_wanted(&context, true));
    }

    #[test]
    fn test_combined_output_separates_streams() {
        let output = ExecOutput {
            success: false,
            code: Some(1),
            stdout: "line".into(),
            stderr: "oops\n".into(),
        };
        assert_eq!(output.combined(), "line\noops\n");
    }
}
