//! Tool definitions
//!
//! This module describes the external formatters, linters and analyzers the
//! hooks run. A [`ToolConfig`] is pure data: where the binary lives, which
//! files it wants and what a failure means for the rest of the run.

mod catalog;

#[cfg(test)]
mod tests;

pub use catalog::builtin_tools;

use crate::context::skip_flag_name;
use crate::hooks::HookKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the engine looks for a tool's executable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationClass {
    /// `node_modules/.bin` of the project
    #[serde(alias = "local")]
    LocalDependencyBin,
    /// Composer's `vendor/bin` of the project
    #[serde(alias = "project")]
    ProjectDependencyBin,
    /// Anything on `PATH`
    #[serde(alias = "system")]
    SystemPath,
}

impl LocationClass {
    /// Directory (relative to the repository root) holding the binaries, if any
    pub fn bin_dir(self) -> Option<&'static str> {
        match self {
            LocationClass::LocalDependencyBin => Some("node_modules/.bin"),
            LocationClass::ProjectDependencyBin => Some("vendor/bin"),
            LocationClass::SystemPath => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationClass::LocalDependencyBin => "local-dependency-bin",
            LocationClass::ProjectDependencyBin => "project-dependency-bin",
            LocationClass::SystemPath => "system-path",
        }
    }
}

impl fmt::Display for LocationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failing tool means for the tools after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep running later tools; the run still fails
    #[default]
    Continue,
    /// Abort the remaining tools of this run
    Stop,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => f.write_str("continue"),
            FailurePolicy::Stop => f.write_str("stop"),
        }
    }
}

/// Category used for selective runs (`GIT_HOOKS_ONLY=format`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ToolGroup {
    Format,
    Lint,
    Analysis,
    Refactor,
}

impl ToolGroup {
    pub const ALL: [ToolGroup; 4] = [
        ToolGroup::Format,
        ToolGroup::Lint,
        ToolGroup::Analysis,
        ToolGroup::Refactor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolGroup::Format => "format",
            ToolGroup::Lint => "lint",
            ToolGroup::Analysis => "analysis",
            ToolGroup::Refactor => "refactor",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl TryFrom<String> for ToolGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| {
            format!("unknown group '{value}' (expected format, lint, analysis or refactor)")
        })
    }
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quality tool in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// Stable identifier, unique within the merged catalog
    pub name: String,

    /// Hook the tool belongs to
    pub hook: HookKind,

    /// Primary executable name
    pub command: String,

    /// Fallback executables, tried in order when `command` is absent
    pub command_alternatives: Vec<String>,

    pub location_class: LocationClass,

    /// Fixed arguments placed before any file arguments
    pub args: Vec<String>,

    /// Lowercase suffixes with a leading dot; empty means any file
    pub extensions: Vec<String>,

    /// Append the matched files to the invocation
    pub pass_files: bool,

    /// Invoke once per matched file instead of once for all of them
    pub run_per_file: bool,

    pub on_failure: FailurePolicy,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<ToolGroup>,

    /// Re-add the processed files to the index after a successful run
    pub stages_files_after: bool,
}

impl ToolConfig {
    /// A pre-commit tool that receives all matched files in one invocation and
    /// lets the run continue when it fails.
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        location_class: LocationClass,
    ) -> Self {
        Self {
            name: name.into(),
            hook: HookKind::PreCommit,
            command: command.into(),
            command_alternatives: Vec::new(),
            location_class,
            args: Vec::new(),
            extensions: Vec::new(),
            pass_files: true,
            run_per_file: false,
            on_failure: FailurePolicy::Continue,
            group: None,
            stages_files_after: false,
        }
    }

    pub fn for_hook(mut self, hook: HookKind) -> Self {
        self.hook = hook;
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn alternatives<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_alternatives = alternatives.into_iter().map(Into::into).collect();
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn group(mut self, group: ToolGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn per_file(mut self) -> Self {
        self.run_per_file = true;
        self
    }

    pub fn without_files(mut self) -> Self {
        self.pass_files = false;
        self
    }

    pub fn stop_on_failure(mut self) -> Self {
        self.on_failure = FailurePolicy::Stop;
        self
    }

    pub fn restage(mut self) -> Self {
        self.stages_files_after = true;
        self
    }

    /// Primary command followed by its alternatives
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.command.as_str())
            .chain(self.command_alternatives.iter().map(String::as_str))
    }

    /// Environment variable that skips this tool
    pub fn skip_flag(&self) -> String {
        skip_flag_name(&self.name)
    }

    pub fn has_extension_filter(&self) -> bool {
        !self.extensions.is_empty()
    }

    /// Whether `path` ends with one of the tool's extensions (case-sensitive)
    pub fn accepts(&self, path: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let file_name = path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path);
        self.extensions
            .iter()
            .any(|ext| file_name.len() > ext.len() && file_name.ends_with(ext.as_str()))
    }
}
