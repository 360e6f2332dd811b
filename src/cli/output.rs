//! Styled terminal output
//!
//! Status lines use the same symbols throughout: ✔ success, ✖ error,
//! ⚠ warning, ℹ info.

use crate::hooks::{HookOutcome, ToolReport, ToolStatus};
use crate::hooks::commit_msg::TicketOutcome;
use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy)]
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn with_verbose(self, verbose: bool) -> Self {
        Self {
            verbose: self.verbose || verbose,
            ..self
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Print an indented block, one line at a time
    pub fn indent(&self, text: &str) {
        for line in text.lines() {
            println!("    {line}");
        }
    }

    /// One summary line per tool record
    pub fn tool_report(&self, report: &ToolReport) {
        let elapsed = style(format!("{}ms", report.duration_ms())).dim();
        match report.status {
            ToolStatus::Passed => {
                self.success(&format!("{} {elapsed}", report.name));
                if self.verbose && !self.quiet && !report.output.trim().is_empty() {
                    self.indent(&report.output);
                }
                if report.restage_failures > 0 {
                    self.warning(&format!(
                        "{}: {} file(s) could not be re-staged",
                        report.name, report.restage_failures
                    ));
                }
            }
            ToolStatus::Failed => {
                let mut message = format!("{} {elapsed}", report.name);
                if !report.failed_files.is_empty() {
                    message.push_str(&format!(" ({})", report.failed_files.join(", ")));
                }
                self.error(&message);
                if !report.output.trim().is_empty() {
                    for line in report.output.lines() {
                        eprintln!("    {line}");
                    }
                }
            }
            ToolStatus::Skipped(reason) => {
                if !self.quiet {
                    println!(
                        "{} {} {}",
                        style("⚠").yellow(),
                        report.name,
                        style(format!("skipped: {reason}")).dim()
                    );
                }
            }
        }
    }

    /// Tool records followed by the verdict for the hook
    pub fn hook_summary(&self, outcome: &HookOutcome) {
        if outcome.skipped {
            self.info(&format!("{} skipped via {}", outcome.hook, outcome.hook.skip_flag()));
            return;
        }

        for report in &outcome.result.reports {
            self.tool_report(report);
        }

        match &outcome.ticket {
            TicketOutcome::Added(footer) => self.info(&format!("Added footer '{footer}'")),
            TicketOutcome::Missing { branch } => self.error(&format!(
                "Branch '{branch}' does not reference a ticket; rename it to include one"
            )),
            TicketOutcome::NotRequired | TicketOutcome::AlreadyPresent(_) => {}
        }

        let result = &outcome.result;
        if let Some(tool) = &result.halted_by {
            self.warning(&format!("Stopped after {tool} failed; remaining tools did not run"));
        }

        let passed = result.count(|s| *s == ToolStatus::Passed);
        let skipped = result.count(|s| matches!(s, ToolStatus::Skipped(_)));
        if outcome.success() {
            self.success(&format!(
                "{} passed ({passed} ran, {skipped} skipped)",
                outcome.hook
            ));
        } else {
            let failed: Vec<&str> = result.failed().map(|r| r.name.as_str()).collect();
            if failed.is_empty() {
                self.error(&format!("{} failed", outcome.hook));
            } else {
                self.error(&format!("{} failed: {}", outcome.hook, failed.join(", ")));
            }
        }
    }
}
