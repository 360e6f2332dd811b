use crate::cli::Output;
use crate::git::GitOperations;
use crate::hooks::HookKind;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args)]
pub struct UninstallArgs {
    /// Also remove hooks that were not installed by booster-hooks
    #[arg(long)]
    pub force: bool,
}

pub async fn execute(args: UninstallArgs, output: &Output) -> Result<ExitCode> {
    let git = GitOperations::discover()?;

    let mut removed = 0;
    for hook in HookKind::ALL {
        if !git.hook_exists(hook) {
            continue;
        }
        if !git.is_managed_hook(hook) && !args.force {
            output.verbose(&format!("Keeping foreign '{hook}' hook"));
            continue;
        }
        if git.remove_hook(hook)? {
            output.success(&format!("Removed '{hook}' hook"));
            removed += 1;
        }
    }

    if removed == 0 {
        output.info("No booster-hooks hooks found to remove");
    }
    Ok(ExitCode::SUCCESS)
}
