use super::direct::{display_name, resolve_in};
use super::{ExecOutput, Executor, Program};
use crate::context::RunContext;
use crate::error::ExecError;
use crate::tools::LocationClass;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs tools inside the DDEV web container via `ddev exec`.
///
/// The project is bind-mounted into the container, so dependency binaries are
/// resolved on the host and addressed by their repository-relative path.
/// System binaries are looked up inside the container with `command -v`,
/// once per command name.
pub struct SandboxedExecutor {
    ddev: PathBuf,
    root: PathBuf,
    search_path: Option<OsString>,
    in_container: RefCell<HashMap<String, bool>>,
}

impl SandboxedExecutor {
    pub fn new(context: &RunContext, ddev: PathBuf) -> Self {
        Self {
            ddev,
            root: context.root().to_path_buf(),
            search_path: context.search_path(),
            in_container: RefCell::new(HashMap::new()),
        }
    }

    fn ddev_exec(&self, line: &str) -> std::io::Result<std::process::Output> {
        Command::new(&self.ddev)
            .arg("exec")
            .arg(line)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
    }

    /// Whether `command` is on the container's PATH
    fn available_in_container(&self, command: &str) -> bool {
        if let Some(&known) = self.in_container.borrow().get(command) {
            return known;
        }

        let found = match self.ddev_exec(&format!("command -v {}", shell_quote(command))) {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::warn!(command, error = %e, "could not query the DDEV container");
                false
            }
        };
        tracing::debug!(command, found, "container lookup");
        self.in_container
            .borrow_mut()
            .insert(command.to_string(), found);
        found
    }

    /// The command line `ddev exec` hands to the container shell
    pub fn command_line(program: &Program, args: &[String]) -> String {
        std::iter::once(program.display())
            .chain(args.iter().map(String::as_str))
            .map(shell_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote a word for a POSIX shell; plain words are left untouched
pub fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

impl Executor for SandboxedExecutor {
    fn name(&self) -> &'static str {
        "ddev"
    }

    fn resolve(&self, command: &str, location: LocationClass) -> Option<Program> {
        match location {
            LocationClass::SystemPath => self
                .available_in_container(command)
                .then(|| Program::new(command, command)),
            _ => {
                let path = resolve_in(&self.root, self.search_path.as_ref(), command, location)?;
                let display = display_name(&self.root, &path, command);
                Some(Program::new(path, display))
            }
        }
    }

    fn run(&self, program: &Program, args: &[String]) -> Result<ExecOutput, ExecError> {
        let line = Self::command_line(program, args);
        tracing::debug!(command = %line, "ddev exec");

        let output = self
            .ddev_exec(&line)
            .map_err(|source| ExecError::Spawn {
                program: format!("ddev exec {}", program.display()),
                source,
            })?;

        Ok(output.into())
    }
}
