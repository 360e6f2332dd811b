use super::Project;
use crate::cli::{GlobalOptions, Output};
use crate::config::{OverrideSource, load_effective_tools};
use crate::hooks::HookKind;
use crate::tools::builtin_tools;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

#[derive(Args)]
pub struct ToolsArgs {
    /// Only list the tools of this hook
    #[arg(long, value_enum)]
    pub hook: Option<HookKind>,
}

pub async fn execute(args: ToolsArgs, global: &GlobalOptions, output: &Output) -> Result<ExitCode> {
    let project = Project::open(global)?;
    let source = OverrideSource::discover(&project.context)?;
    let tools = load_effective_tools(builtin_tools(), &source)?;

    match source.path() {
        Some(path) => output.info(&format!("Overrides from {}", path.display())),
        None => output.info("No override document; built-in catalog"),
    }

    let hooks = match args.hook {
        Some(hook) => vec![hook],
        None => HookKind::ALL.to_vec(),
    };

    for hook in hooks {
        output.header(hook.as_str());
        for tool in tools.iter().filter(|t| t.hook == hook) {
            let mut details = vec![
                tool.group.map_or("-".to_string(), |g| g.to_string()),
                tool.location_class.to_string(),
                format!("on failure: {}", tool.on_failure),
                tool.skip_flag(),
            ];
            if project.context.tool_skipped(&tool.name) {
                details.push("skipped".to_string());
            }
            output.table_row(&tool.name, &details.join("  "));
        }
    }

    Ok(ExitCode::SUCCESS)
}
