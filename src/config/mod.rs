//! Override document loading and catalog merging
//!
//! A project can tune the built-in catalog with an override document
//! (`.git-hooks.yml`, `.git-hooks.toml` or `.git-hooks.json` at the repository
//! root, or any path named by `GIT_HOOKS_CONFIG`). Overrides are keyed by tool
//! name:
//!
//! - a builtin name gets a field-level merge (override wins, arrays replace)
//! - `enabled: false` removes the tool from the run
//! - an unknown name defines a custom tool, which must at least provide
//!   `command` and `locationClass`
//!
//! ```yaml
//! verbose: false
//! skip:
//!   prePush: true
//! tools:
//!   Rector:
//!     enabled: false
//!   PHPStan:
//!     onFailure: stop
//! commit:
//!   ticketIdPrefix: "PRJ|ERM"
//!   ticketNumberPattern: "[0-9]+"
//!   footerLabel: Closes
//! ```

pub mod smart_load;

#[cfg(test)]
mod tests;

use crate::context::RunContext;
use crate::error::ConfigError;
use crate::hooks::gate::filter_by_groups;
use crate::hooks::HookKind;
use crate::tools::{FailurePolicy, LocationClass, ToolConfig, ToolGroup};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Documents looked up at the repository root, first match wins
pub const DEFAULT_DOCUMENTS: [&str; 4] = [
    ".git-hooks.yml",
    ".git-hooks.yaml",
    ".git-hooks.toml",
    ".git-hooks.json",
];

/// The per-project override document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideDocument {
    #[serde(default)]
    pub verbose: Option<bool>,

    #[serde(default)]
    pub skip: SkipSettings,

    #[serde(default)]
    pub tools: BTreeMap<String, ToolOverride>,

    #[serde(default)]
    pub commit: CommitSettings,
}

/// Whole-hook and well-known step switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkipSettings {
    pub pre_commit: bool,
    pub pre_push: bool,
    pub commit_msg: bool,
    pub tests: bool,
    pub artifacts: bool,
}

/// Ticket footer settings for the commit-msg hook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitSettings {
    /// Alternation of accepted prefixes, e.g. `PRJ|ERM`
    pub ticket_id_prefix: Option<String>,
    /// Regex for the number part, e.g. `[0-9]+`
    pub ticket_number_pattern: Option<String>,
    pub footer_label: Option<String>,
}

/// Partial tool definition; every present field replaces the builtin one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToolOverride {
    pub enabled: Option<bool>,
    pub hook: Option<HookKind>,
    pub command: Option<String>,
    pub command_alternatives: Option<Vec<String>>,
    pub location_class: Option<LocationClass>,
    pub args: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub pass_files: Option<bool>,
    pub run_per_file: Option<bool>,
    pub on_failure: Option<FailurePolicy>,
    pub group: Option<ToolGroup>,
    pub stages_files_after: Option<bool>,
}

impl ToolOverride {
    fn is_disabled(&self) -> bool {
        self.enabled == Some(false)
    }

    fn apply_to(&self, tool: &mut ToolConfig) {
        if let Some(hook) = self.hook {
            tool.hook = hook;
        }
        if let Some(command) = &self.command {
            tool.command = command.clone();
        }
        if let Some(alternatives) = &self.command_alternatives {
            tool.command_alternatives = alternatives.clone();
        }
        if let Some(location) = self.location_class {
            tool.location_class = location;
        }
        if let Some(args) = &self.args {
            tool.args = args.clone();
        }
        if let Some(extensions) = &self.extensions {
            tool.extensions = dedup(extensions);
        }
        if let Some(pass_files) = self.pass_files {
            tool.pass_files = pass_files;
        }
        if let Some(run_per_file) = self.run_per_file {
            tool.run_per_file = run_per_file;
        }
        if let Some(on_failure) = self.on_failure {
            tool.on_failure = on_failure;
        }
        if let Some(group) = self.group {
            tool.group = Some(group);
        }
        if let Some(stages) = self.stages_files_after {
            tool.stages_files_after = stages;
        }
    }

    /// Build a tool that has no builtin counterpart
    fn build_custom(&self, name: &str) -> Result<ToolConfig, ConfigError> {
        let command = self.command.clone().ok_or_else(|| ConfigError::MissingField {
            name: name.to_string(),
            field: "command",
        })?;
        let location = self.location_class.ok_or_else(|| ConfigError::MissingField {
            name: name.to_string(),
            field: "locationClass",
        })?;

        let mut tool = ToolConfig::new(name, command, location);
        self.apply_to(&mut tool);
        Ok(tool)
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.command.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ConfigError::EmptyCommand {
                name: name.to_string(),
            });
        }

        for extension in self.extensions.iter().flatten() {
            let valid = extension.len() > 1
                && extension.starts_with('.')
                && !extension.chars().any(char::is_uppercase)
                && !extension.contains(['/', '\\']);
            if !valid {
                return Err(ConfigError::InvalidExtension {
                    name: name.to_string(),
                    extension: extension.clone(),
                });
            }
        }
        Ok(())
    }
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}

/// Location of the override document plus its parsed, cached contents.
///
/// The document is read at most once per invocation; later calls return the
/// cached result.
#[derive(Debug, Default)]
pub struct OverrideSource {
    path: Option<PathBuf>,
    cache: OnceCell<Option<OverrideDocument>>,
}

impl OverrideSource {
    /// Resolve the document for a run: the explicit path from the context, or
    /// the first default document found at the repository root.
    pub fn discover(context: &RunContext) -> Result<Self, ConfigError> {
        if let Some(explicit) = context.config_path() {
            let path = if explicit.is_absolute() {
                explicit.to_path_buf()
            } else {
                context.root().join(explicit)
            };
            if !path.is_file() {
                return Err(ConfigError::NotFound { path });
            }
            return Ok(Self::at(path));
        }

        let found = DEFAULT_DOCUMENTS
            .iter()
            .map(|name| context.root().join(name))
            .find(|candidate| candidate.is_file());

        match found {
            Some(path) => Ok(Self::at(path)),
            None => Ok(Self::empty()),
        }
    }

    /// A source backed by a specific file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            cache: OnceCell::new(),
        }
    }

    /// A source without any document; the builtins are used as-is
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Parsed document, or `None` when there is no document
    pub fn document(&self) -> Result<Option<&OverrideDocument>, ConfigError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.as_ref());
        }

        let parsed = match &self.path {
            Some(path) => read_document(path)?,
            None => None,
        };
        Ok(self.cache.get_or_init(|| parsed).as_ref())
    }
}

fn read_document(path: &Path) -> Result<Option<OverrideDocument>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim().is_empty() {
        tracing::debug!(path = %path.display(), "override document is empty");
        return Ok(None);
    }

    let document: OverrideDocument = Figment::new()
        .merge(smart_load::auto(path))
        .extract()
        .map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

    for (name, tool) in document.tools.iter().filter(|(_, tool)| !tool.is_disabled()) {
        tool.validate(name)?;
    }

    tracing::debug!(
        path = %path.display(),
        tools = document.tools.len(),
        "loaded override document"
    );
    Ok(Some(document))
}

/// Merge the override document (if any) into the builtin catalog
pub fn load_effective_tools(
    builtins: Vec<ToolConfig>,
    source: &OverrideSource,
) -> Result<Vec<ToolConfig>, ConfigError> {
    match source.document()? {
        Some(document) => merge_overrides(builtins, &document.tools),
        None => Ok(builtins),
    }
}

/// Apply overrides keyed by tool name. Builtins keep their order; custom tools
/// are appended in name order.
pub fn merge_overrides(
    builtins: Vec<ToolConfig>,
    overrides: &BTreeMap<String, ToolOverride>,
) -> Result<Vec<ToolConfig>, ConfigError> {
    let builtin_names: HashSet<String> = builtins.iter().map(|t| t.name.clone()).collect();
    let mut merged = Vec::with_capacity(builtins.len() + overrides.len());

    for mut tool in builtins {
        match overrides.get(&tool.name) {
            Some(entry) if entry.is_disabled() => {
                tracing::debug!(tool = %tool.name, "disabled by override document");
            }
            Some(entry) => {
                entry.validate(&tool.name)?;
                entry.apply_to(&mut tool);
                merged.push(tool);
            }
            None => merged.push(tool),
        }
    }

    for (name, entry) in overrides {
        if builtin_names.contains(name.as_str()) || entry.is_disabled() {
            continue;
        }
        entry.validate(name)?;
        merged.push(entry.build_custom(name)?);
    }

    Ok(merged)
}

/// Everything one hook invocation needs: the context with document toggles
/// folded in and the gated tool list for the hook.
#[derive(Debug, Clone)]
pub struct EffectiveRunConfig {
    pub hook: HookKind,
    pub context: RunContext,
    pub tools: Vec<ToolConfig>,
    pub commit: CommitSettings,
}

impl EffectiveRunConfig {
    pub fn build(
        hook: HookKind,
        builtins: Vec<ToolConfig>,
        source: &OverrideSource,
        context: RunContext,
    ) -> Result<Self, ConfigError> {
        let document = source.document()?;
        let context = match document {
            Some(document) => context.apply_document(document),
            None => context,
        };

        let tools: Vec<ToolConfig> = load_effective_tools(builtins, source)?
            .into_iter()
            .filter(|tool| tool.hook == hook)
            .collect();
        let tools = filter_by_groups(tools, context.requested_groups());

        Ok(Self {
            hook,
            commit: document.map(|d| d.commit.clone()).unwrap_or_default(),
            context,
            tools,
        })
    }

    pub fn hook_skipped(&self) -> bool {
        self.context.hook_skipped(self.hook)
    }
}
