//! Hook orchestration
//!
//! A hook run goes through the same steps for every hook kind:
//!
//! 1. load the override document and merge it into the builtin catalog
//! 2. narrow the tools to the running hook and the requested groups
//! 3. collect the hook's file set from git
//! 4. run the tools sequentially through the selected [`Executor`]
//! 5. hook-specific follow-up (the ticket footer for commit-msg)
//!
//! [`Executor`]: crate::external::Executor

pub mod commit_msg;
pub mod executor;
pub mod files;
pub mod gate;
pub mod pre_commit;
pub mod pre_push;
pub mod restage;


pub use executor::{RunResult, SkipReason, ToolReport, ToolRunner, ToolStatus};
pub use files::{FileSet, select_files};
pub use restage::Stager;

use crate::cli::Output;
use crate::config::{EffectiveRunConfig, OverrideSource};
use crate::context::RunContext;
use crate::external::select_executor;
use crate::git::GitOperations;
use crate::git::commit::TicketPolicy;
use crate::tools::builtin_tools;
use anyhow::Result;
use commit_msg::TicketOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The git hooks the runner knows how to drive
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    #[default]
    PreCommit,
    PrePush,
    CommitMsg,
}

impl HookKind {
    pub const ALL: [HookKind; 3] = [HookKind::PreCommit, HookKind::PrePush, HookKind::CommitMsg];

    /// Name of the hook file under `.git/hooks`
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::PreCommit => "pre-commit",
            HookKind::PrePush => "pre-push",
            HookKind::CommitMsg => "commit-msg",
        }
    }

    /// Environment flag that skips the whole hook
    pub fn skip_flag(self) -> &'static str {
        match self {
            HookKind::PreCommit => "SKIP_PRECOMMIT",
            HookKind::PrePush => "SKIP_PREPUSH",
            HookKind::CommitMsg => "SKIP_COMMITMSG",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.as_str() == s)
            .ok_or_else(|| format!("unknown hook '{s}' (expected pre-commit, pre-push or commit-msg)"))
    }
}

/// What happened during one hook invocation
#[derive(Debug)]
pub struct HookOutcome {
    pub hook: HookKind,
    /// The whole hook was switched off by a skip flag
    pub skipped: bool,
    /// Verbose after folding in the override document
    pub verbose: bool,
    pub result: RunResult,
    pub ticket: TicketOutcome,
}

impl HookOutcome {
    fn skipped(hook: HookKind, verbose: bool) -> Self {
        Self {
            hook,
            skipped: true,
            verbose,
            result: RunResult::default(),
            ticket: TicketOutcome::NotRequired,
        }
    }

    /// Whether the calling git operation may proceed
    pub fn success(&self) -> bool {
        self.skipped || (self.result.success && !matches!(self.ticket, TicketOutcome::Missing { .. }))
    }
}

/// Load the override document and build the effective configuration for
/// `hook`. Fails with a `ConfigError` before anything runs.
pub fn load_hook_config(hook: HookKind, context: RunContext) -> Result<EffectiveRunConfig> {
    let source = OverrideSource::discover(&context)?;
    Ok(EffectiveRunConfig::build(hook, builtin_tools(), &source, context)?)
}

/// Run every tool of the configured hook against the files git hands over.
///
/// `hook_args` are the arguments git passed to the hook script; only
/// commit-msg uses them (the message file path).
pub fn run_hook(
    config: EffectiveRunConfig,
    hook_args: &[String],
    git: &GitOperations,
    output: &Output,
) -> Result<HookOutcome> {
    let hook = config.hook;
    if config.hook_skipped() {
        tracing::info!(hook = %hook, flag = hook.skip_flag(), "hook skipped");
        return Ok(HookOutcome::skipped(hook, config.context.is_verbose()));
    }

    // Ticket settings are validated before any tool gets to run
    let ticket_policy = match hook {
        HookKind::CommitMsg => Some(TicketPolicy::from_settings(&config.commit)?),
        _ => None,
    };

    let files = match hook {
        HookKind::PreCommit => pre_commit::collect_files(git)?,
        HookKind::PrePush => pre_push::collect_files(git)?,
        HookKind::CommitMsg => commit_msg::collect_files(hook_args)?,
    };
    tracing::debug!(hook = %hook, files = files.len(), tools = config.tools.len(), "starting hook");

    let executor = select_executor(&config.context);
    let runner = ToolRunner::new(&config.context, executor.as_ref(), git, output);
    let result = runner.run_tools(&config.tools, &files);

    let ticket = match ticket_policy {
        Some(policy) if result.success => commit_msg::apply_ticket(&policy, git, &files)?,
        _ => TicketOutcome::NotRequired,
    };

    Ok(HookOutcome {
        hook,
        skipped: false,
        verbose: config.context.is_verbose(),
        result,
        ticket,
    })
}
