use super::Project;
use crate::cli::{GlobalOptions, Output};
use crate::hooks::gate::unknown_groups;
use crate::hooks::{HookKind, load_hook_config, run_hook};
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args)]
pub struct RunArgs {
    /// Hook to run
    #[arg(value_enum)]
    pub hook: HookKind,

    /// Arguments git passed to the hook (commit-msg: the message file)
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,

    /// Only run these tool groups plus ungrouped tools (comma-separated)
    #[arg(long, value_name = "GROUPS", env = "GIT_HOOKS_ONLY")]
    pub only: Option<String>,
}

pub async fn execute(args: RunArgs, global: &GlobalOptions, output: &Output) -> Result<ExitCode> {
    let project = Project::open(global)?;
    let context = project.context.with_groups(args.only.as_deref());

    if let Some(requested) = context.requested_groups() {
        let unknown = unknown_groups(requested);
        if !unknown.is_empty() {
            output.warning(&format!(
                "Unknown tool group(s): {} (known: format, lint, analysis, refactor)",
                unknown.join(", ")
            ));
        }
    }

    let config = load_hook_config(args.hook, context)?;
    if config.context.is_verbose() {
        global.logging.raise_to_info();
    }

    let outcome = run_hook(config, &args.args, &project.git, output)?;
    output.with_verbose(outcome.verbose).hook_summary(&outcome);

    Ok(if outcome.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
