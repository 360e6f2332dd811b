use crate::cli::Output;
use crate::git::{GitOperations, hook_script};
use crate::hooks::HookKind;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args)]
pub struct InstallArgs {
    /// Hooks to install (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub hooks: Vec<HookKind>,

    /// Overwrite hooks that were not installed by booster-hooks
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: InstallArgs, output: &Output) -> Result<ExitCode> {
    let git = GitOperations::discover()?;
    let hooks = if args.hooks.is_empty() {
        HookKind::ALL.to_vec()
    } else {
        args.hooks
    };

    let mut blocked = Vec::new();
    for hook in hooks {
        if git.hook_exists(hook) && !git.is_managed_hook(hook) && !args.force {
            blocked.push(hook);
            continue;
        }
        let path = git.install_hook(hook, &hook_script(hook))?;
        output.success(&format!("Installed '{hook}' hook"));
        output.verbose(&path.display().to_string());
    }

    if blocked.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    for hook in &blocked {
        output.warning(&format!("Existing '{hook}' hook left untouched"));
    }
    output.info("Run with --force to replace hooks installed by other tools");
    Ok(ExitCode::FAILURE)
}
