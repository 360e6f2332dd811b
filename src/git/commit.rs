//! Commit message utilities
//!
//! Ticket references are taken from the branch name (`feature/PRJ-123-login`)
//! and appended to the commit message as a footer (`Closes: PRJ-123`).

use crate::config::CommitSettings;
use crate::error::ConfigError;
use regex::{Regex, RegexBuilder};

pub const DEFAULT_FOOTER_LABEL: &str = "Closes";

/// Line below which git drops everything in `commit --verbose` messages
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// Footer labels must look like a trailer key; anything else becomes `Closes`
pub fn sanitize_footer_label(label: Option<&str>) -> String {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return DEFAULT_FOOTER_LABEL.to_string();
    };

    let mut chars = label.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        label.to_string()
    } else {
        DEFAULT_FOOTER_LABEL.to_string()
    }
}

/// Whether and how commit messages must reference a ticket
#[derive(Debug, Clone)]
pub struct TicketPolicy {
    regex: Option<Regex>,
    footer_label: String,
}

impl TicketPolicy {
    pub fn from_settings(settings: &CommitSettings) -> Result<Self, ConfigError> {
        let footer_label = sanitize_footer_label(settings.footer_label.as_deref());

        let prefix = settings.ticket_id_prefix.as_deref().map(str::trim).unwrap_or("");
        let number = settings
            .ticket_number_pattern
            .as_deref()
            .map(str::trim)
            .unwrap_or("");
        if prefix.is_empty() || number.is_empty() {
            return Ok(Self {
                regex: None,
                footer_label,
            });
        }

        let pattern = format!("((?:{prefix})-{number})");
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::TicketPattern {
                pattern: pattern.clone(),
                source,
            })?;

        Ok(Self {
            regex: Some(regex),
            footer_label,
        })
    }

    /// Both a prefix and a number pattern are configured
    pub fn needs_ticket(&self) -> bool {
        self.regex.is_some()
    }

    pub fn footer_label(&self) -> &str {
        &self.footer_label
    }

    /// First ticket reference in the branch name, as written there
    pub fn extract_ticket(&self, branch: &str) -> Option<String> {
        let captures = self.regex.as_ref()?.captures(branch)?;
        captures.get(1).map(|m| m.as_str().to_string())
    }

    pub fn footer(&self, ticket: &str) -> String {
        format!("{}: {ticket}", self.footer_label)
    }

    /// Message with the footer added, or `None` if it is already there
    pub fn apply_footer(&self, message: &str, ticket: &str) -> Option<String> {
        let footer = self.footer(ticket);

        let (body, tail) = match message.find(SCISSORS) {
            Some(at) => message.split_at(at),
            None => (message, ""),
        };

        if body.lines().any(|line| line.trim() == footer) {
            return None;
        }

        let mut updated = String::with_capacity(message.len() + footer.len() + 3);
        updated.push_str(body);
        if !body.is_empty() && !body.ends_with('\n') {
            updated.push('\n');
        }
        updated.push('\n');
        updated.push_str(&footer);
        updated.push('\n');
        updated.push_str(tail);
        Some(updated)
    }
}
