//! Command-line interface
//!
//! Argument parsing with clap plus the tracing subscriber setup. Every
//! subcommand lives in its own module under `commands`.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

pub mod commands;
mod output;

pub use output::Output;

use commands::{config, install, run, tools, uninstall};

/// Rule-driven git hooks for PHP/JS quality tooling
#[derive(Parser)]
#[command(
    name = "booster-hooks",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rule-driven git hooks for PHP/JS quality tooling",
    long_about = "booster-hooks runs formatters, linters and static analyzers from git hooks, \
                  driven by a built-in catalog that projects can tune with a .git-hooks.yml document."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use a custom override document instead of .git-hooks.yml
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a hook (this is what the installed hook scripts call)
    Run(run::RunArgs),
    /// Install hook scripts into the current repository
    Install(install::InstallArgs),
    /// Remove the hook scripts installed by this tool
    Uninstall(uninstall::UninstallArgs),
    /// List the effective tools after merging the override document
    Tools(tools::ToolsArgs),
    /// Validate or display the override document
    Config(config::ConfigArgs),
}

/// Options shared by every subcommand
pub struct GlobalOptions {
    pub verbose: bool,
    pub config: Option<String>,
    pub logging: Logging,
}

/// Handle on the installed log filter
pub struct Logging {
    /// Present only while the level still follows the default (`warn`)
    default_filter: Option<reload::Handle<EnvFilter, Registry>>,
}

impl Logging {
    /// Raise a default `warn` filter to `info`. An explicit `RUST_LOG` or
    /// `-v` level is left alone.
    pub fn raise_to_info(&self) {
        if let Some(handle) = &self.default_filter {
            if let Err(e) = handle.reload(EnvFilter::new("info")) {
                eprintln!("failed to raise log level: {e}");
            }
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        let logging = setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let global = GlobalOptions {
            verbose: self.verbose > 0,
            config: self.config,
            logging,
        };

        match self.command {
            Some(Commands::Run(args)) => run::execute(args, &global, &output).await,
            Some(Commands::Install(args)) => install::execute(args, &output).await,
            Some(Commands::Uninstall(args)) => uninstall::execute(args, &output).await,
            Some(Commands::Tools(args)) => tools::execute(args, &global, &output).await,
            Some(Commands::Config(args)) => config::execute(args, &global, &output).await,
            None => {
                Cli::command().print_help()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) -> Logging {
    if quiet {
        return Logging { default_filter: None };
    }

    let (filter, is_default) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) => match verbose {
            0 => (EnvFilter::new("warn"), true),
            1 => (EnvFilter::new("info"), false),
            2 => (EnvFilter::new("debug"), false),
            _ => (EnvFilter::new("trace"), false),
        },
    };
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok();

    Logging {
        default_filter: (installed && is_default).then_some(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_hook_arguments() {
        let cli = Cli::try_parse_from([
            "booster-hooks",
            "-vv",
            "run",
            "commit-msg",
            ".git/COMMIT_EDITMSG",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.hook, crate::hooks::HookKind::CommitMsg);
                assert_eq!(args.args, vec![".git/COMMIT_EDITMSG"]);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_unknown_hook_is_rejected() {
        assert!(Cli::try_parse_from(["booster-hooks", "run", "post-merge"]).is_err());
    }
}
