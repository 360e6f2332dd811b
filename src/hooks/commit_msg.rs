//! Commit-msg hook
//!
//! The only candidate file is the message file git hands over. Once the
//! tools accept the message, the ticket footer is added when the project
//! requires one.

use super::FileSet;
use crate::git::GitOperations;
use crate::git::commit::TicketPolicy;
use anyhow::{Context, Result, bail};
use std::fs;

/// Result of the ticket footer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    /// No ticket policy configured
    NotRequired,
    Added(String),
    AlreadyPresent(String),
    /// A ticket is required but the branch name carries none
    Missing { branch: String },
}

pub fn collect_files(hook_args: &[String]) -> Result<FileSet> {
    let Some(message_file) = hook_args.first().filter(|f| !f.is_empty()) else {
        bail!("commit-msg needs the commit message file as its first argument");
    };
    Ok(FileSet::new([message_file.as_str()]))
}

/// Append the ticket footer to the message file when the policy asks for it
pub fn apply_ticket(
    policy: &TicketPolicy,
    git: &GitOperations,
    files: &FileSet,
) -> Result<TicketOutcome> {
    if !policy.needs_ticket() {
        return Ok(TicketOutcome::NotRequired);
    }

    let branch = git.current_branch()?;
    let Some(ticket) = policy.extract_ticket(&branch) else {
        tracing::warn!(branch = %branch, "branch name carries no ticket reference");
        return Ok(TicketOutcome::Missing { branch });
    };

    let Some(message_file) = files.iter().next() else {
        bail!("no commit message file to update");
    };
    let path = git.workdir()?.join(message_file);
    let message = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read commit message {}", path.display()))?;

    match policy.apply_footer(&message, &ticket) {
        Some(updated) => {
            fs::write(&path, updated)
                .with_context(|| format!("Failed to write commit message {}", path.display()))?;
            tracing::info!(ticket = %ticket, "added ticket footer");
            Ok(TicketOutcome::Added(policy.footer(&ticket)))
        }
        None => Ok(TicketOutcome::AlreadyPresent(policy.footer(&ticket))),
    }
}
