use super::Project;
use crate::cli::{GlobalOptions, Output};
use crate::config::{CommitSettings, OverrideSource, SkipSettings, load_effective_tools};
use crate::git::commit::TicketPolicy;
use crate::tools::{ToolConfig, builtin_tools};
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Check the override document and the merged catalog
    Validate,
    /// Display the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ShowFormat::Yaml)]
        format: ShowFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowFormat {
    Yaml,
    Json,
    Toml,
}

/// What `config show` prints
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EffectiveView {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    verbose: bool,
    skip: SkipSettings,
    commit: CommitSettings,
    tools: Vec<ToolConfig>,
}

pub async fn execute(args: ConfigArgs, global: &GlobalOptions, output: &Output) -> Result<ExitCode> {
    let project = Project::open(global)?;
    let source = OverrideSource::discover(&project.context)?;

    match args.command {
        ConfigCommand::Validate => {
            let tools = load_effective_tools(builtin_tools(), &source)?;
            let commit = source.document()?.map(|d| d.commit.clone()).unwrap_or_default();
            TicketPolicy::from_settings(&commit)?;

            match source.path() {
                Some(path) => output.success(&format!(
                    "{} is valid ({} tools)",
                    path.display(),
                    tools.len()
                )),
                None => output.info(&format!(
                    "No override document found; using the built-in catalog ({} tools)",
                    tools.len()
                )),
            }
        }
        ConfigCommand::Show { format } => {
            let tools = load_effective_tools(builtin_tools(), &source)?;
            let document = source.document()?.cloned().unwrap_or_default();
            let context = project.context.apply_document(&document);

            let view = EffectiveView {
                source: source.path().map(|p| p.display().to_string()),
                verbose: context.is_verbose(),
                skip: document.skip,
                commit: document.commit,
                tools,
            };

            let rendered = match format {
                ShowFormat::Yaml => serde_yml::to_string(&view).context("Failed to render YAML")?,
                ShowFormat::Json => {
                    serde_json::to_string_pretty(&view).context("Failed to render JSON")?
                }
                ShowFormat::Toml => toml::to_string_pretty(&view).context("Failed to render TOML")?,
            };
            println!("{}", rendered.trim_end());
        }
    }

    Ok(ExitCode::SUCCESS)
}
