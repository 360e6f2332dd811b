//! Sequential tool execution
//!
//! Tools run one after another in list order: auto-fixers rewrite files that
//! later analyzers must see. Per tool the engine resolves a binary, honours the
//! skip flag, selects the files, invokes the binary and finally re-stages what
//! an auto-fixer touched.

use super::files::{FileSet, select_files};
use super::restage::{Stager, restage};
use crate::cli::Output;
use crate::context::RunContext;
use crate::external::{Executor, Program};
use crate::tools::{FailurePolicy, ToolConfig};
use std::fmt;
use std::time::{Duration, Instant};

/// Why a tool did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BinaryNotFound,
    ExplicitlySkipped,
    NoMatchingFiles,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::BinaryNotFound => "binary not found",
            SkipReason::ExplicitlySkipped => "explicitly skipped",
            SkipReason::NoMatchingFiles => "no matching files",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Passed,
    Failed,
    Skipped(SkipReason),
}

/// Outcome of one tool within a run
#[derive(Debug, Clone)]
pub struct ToolReport {
    pub name: String,
    pub status: ToolStatus,
    pub duration: Duration,
    /// Resolved binary, when one was found
    pub program: Option<String>,
    /// Number of files handed to the tool
    pub files: usize,
    /// Files whose per-file invocation failed
    pub failed_files: Vec<String>,
    /// Captured stdout and stderr of every invocation
    pub output: String,
    /// Files that could not be re-staged after a successful fix
    pub restage_failures: usize,
}

impl ToolReport {
    fn new(name: &str, program: Option<&Program>) -> Self {
        Self {
            name: name.to_string(),
            status: ToolStatus::Passed,
            duration: Duration::ZERO,
            program: program.map(|p| p.display().to_string()),
            files: 0,
            failed_files: Vec::new(),
            output: String::new(),
            restage_failures: 0,
        }
    }

    /// Passed or skipped; skipping never fails a run
    pub fn ok(&self) -> bool {
        self.status != ToolStatus::Failed
    }

    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }

    pub fn skipped_reason(&self) -> Option<SkipReason> {
        match self.status {
            ToolStatus::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Aggregate of a whole run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub success: bool,
    /// One record per tool that was considered, in execution order
    pub reports: Vec<ToolReport>,
    /// Tool whose `stop` policy ended the run early
    pub halted_by: Option<String>,
}

impl Default for RunResult {
    fn default() -> Self {
        Self {
            success: true,
            reports: Vec::new(),
            halted_by: None,
        }
    }
}

impl RunResult {
    pub fn get(&self, name: &str) -> Option<&ToolReport> {
        self.reports.iter().find(|r| r.name == name)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ToolReport> {
        self.reports.iter().filter(|r| !r.ok())
    }

    pub fn count(&self, predicate: impl Fn(&ToolStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| predicate(&r.status)).count()
    }
}

/// Runs a tool list against a file set
pub struct ToolRunner<'a> {
    context: &'a RunContext,
    executor: &'a dyn Executor,
    stager: &'a dyn Stager,
    output: &'a Output,
}

impl<'a> ToolRunner<'a> {
    pub fn new(
        context: &'a RunContext,
        executor: &'a dyn Executor,
        stager: &'a dyn Stager,
        output: &'a Output,
    ) -> Self {
        Self {
            context,
            executor,
            stager,
            output,
        }
    }

    pub fn run_tools(&self, tools: &[ToolConfig], files: &FileSet) -> RunResult {
        let mut result = RunResult::default();

        for tool in tools {
            let report = self.run_tool(tool, files);
            let failed = report.status == ToolStatus::Failed;
            result.reports.push(report);

            if !failed {
                continue;
            }
            result.success = false;
            if tool.on_failure == FailurePolicy::Stop {
                tracing::warn!(tool = %tool.name, "tool failed with stop policy, skipping remaining tools");
                result.halted_by = Some(tool.name.clone());
                break;
            }
        }

        result
    }

    fn run_tool(&self, tool: &ToolConfig, files: &FileSet) -> ToolReport {
        let started = Instant::now();

        let Some(program) = self.resolve(tool) else {
            return self.skip(tool, None, SkipReason::BinaryNotFound, started);
        };

        if self.context.tool_skipped(&tool.name) {
            return self.skip(tool, Some(&program), SkipReason::ExplicitlySkipped, started);
        }

        let selected = select_files(tool, files);
        if selected.is_empty() && wants_files(tool) {
            return self.skip(tool, Some(&program), SkipReason::NoMatchingFiles, started);
        }

        self.output.step(&format!("{} ({})", tool.name, program.display()));
        let mut report = ToolReport::new(&tool.name, Some(&program));
        report.files = if tool.pass_files || tool.run_per_file {
            selected.len()
        } else {
            0
        };

        let passed = if tool.run_per_file {
            self.run_per_file(tool, &program, &selected, &mut report)
        } else {
            let mut args = tool.args.clone();
            if tool.pass_files {
                args.extend(selected.iter().map(str::to_string));
            }
            self.invoke(tool, &program, &args, &mut report)
        };

        if passed {
            if tool.stages_files_after && report.files > 0 {
                report.restage_failures = restage(self.stager, &tool.name, &selected);
            }
        } else {
            report.status = ToolStatus::Failed;
        }

        report.duration = started.elapsed();
        tracing::info!(
            tool = %tool.name,
            duration_ms = report.duration_ms() as u64,
            passed,
            "tool finished"
        );
        report
    }

    /// One invocation per file; `stop` aborts at the first failing file
    fn run_per_file(
        &self,
        tool: &ToolConfig,
        program: &Program,
        selected: &FileSet,
        report: &mut ToolReport,
    ) -> bool {
        for file in selected {
            let mut args = tool.args.clone();
            args.push(file.clone());

            if !self.invoke(tool, program, &args, report) {
                report.failed_files.push(file.clone());
                if tool.on_failure == FailurePolicy::Stop {
                    break;
                }
            }
        }
        report.failed_files.is_empty()
    }

    fn invoke(
        &self,
        tool: &ToolConfig,
        program: &Program,
        args: &[String],
        report: &mut ToolReport,
    ) -> bool {
        tracing::debug!(tool = %tool.name, program = %program.display(), ?args, "invoking");

        match self.executor.run(program, args) {
            Ok(output) => {
                report.output.push_str(&output.combined());
                if !output.success {
                    tracing::debug!(tool = %tool.name, code = ?output.code, "tool exited with failure");
                }
                output.success
            }
            Err(e) => {
                tracing::warn!(tool = %tool.name, error = %e, "failed to launch tool");
                report.output.push_str(&e.to_string());
                report.output.push('\n');
                false
            }
        }
    }

    /// First candidate binary the executor can find
    fn resolve(&self, tool: &ToolConfig) -> Option<Program> {
        tool.candidates().find_map(|command| {
            let found = self.executor.resolve(command, tool.location_class);
            if found.is_none() {
                tracing::debug!(tool = %tool.name, command, location = %tool.location_class, "binary not found");
            }
            found
        })
    }

    fn skip(
        &self,
        tool: &ToolConfig,
        program: Option<&Program>,
        reason: SkipReason,
        started: Instant,
    ) -> ToolReport {
        tracing::info!(tool = %tool.name, reason = %reason, "tool skipped");
        let mut report = ToolReport::new(&tool.name, program);
        report.status = ToolStatus::Skipped(reason);
        report.duration = started.elapsed();
        report
    }
}

/// Tools that operate on the matched files have nothing to do without them
fn wants_files(tool: &ToolConfig) -> bool {
    tool.pass_files || tool.run_per_file || tool.has_extension_filter()
}
