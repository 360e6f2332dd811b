//! Command implementations
//!
//! Each command is organized into its own module.

pub mod config;
pub mod install;
pub mod run;
pub mod tools;
pub mod uninstall;

use super::GlobalOptions;
use crate::context::RunContext;
use crate::git::GitOperations;
use anyhow::Result;

/// Repository plus the run context rooted at its work tree
pub struct Project {
    pub git: GitOperations,
    pub context: RunContext,
}

impl Project {
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let git = GitOperations::discover()?;
        let root = git.workdir()?.to_path_buf();
        let context = RunContext::from_env(root)
            .with_verbose(global.verbose)
            .with_config_path(global.config.as_deref());
        Ok(Self { git, context })
    }
}
