//! Per-invocation run context
//!
//! Everything the runner reads from the environment is captured once, when a
//! hook starts, into a [`RunContext`]. Components receive the context by
//! reference instead of calling `std::env::var` themselves.

use crate::config::OverrideDocument;
use crate::hooks::HookKind;
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "GIT_HOOKS_CONFIG";
pub const VERBOSE_VAR: &str = "GIT_HOOKS_VERBOSE";
pub const GROUPS_VAR: &str = "GIT_HOOKS_ONLY";
pub const NO_SANDBOX_VAR: &str = "GIT_HOOKS_NO_SANDBOX";
/// Set to `true` by DDEV inside its web container.
pub const IN_CONTAINER_VAR: &str = "IS_DDEV_PROJECT";

/// Environment key for a per-tool or per-hook skip flag.
///
/// The name is uppercased and every character that is not an ASCII letter or
/// digit becomes `_`, so `PHP Syntax` maps to `SKIP_PHP_SYNTAX`.
pub fn skip_flag_name(name: &str) -> String {
    let key: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("SKIP_{key}")
}

/// Whether an environment value switches a flag on.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a comma-separated group list. Names are lowercased; an empty list
/// means "no filter".
pub fn parse_groups(raw: &str) -> Option<BTreeSet<String>> {
    let groups: BTreeSet<String> = raw
        .split(',')
        .map(|g| g.trim().to_ascii_lowercase())
        .filter(|g| !g.is_empty())
        .collect();

    if groups.is_empty() { None } else { Some(groups) }
}

/// Snapshot of the environment-derived toggles for one hook invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    root: PathBuf,
    vars: HashMap<String, String>,
    verbose: bool,
    groups: Option<BTreeSet<String>>,
    config_path: Option<PathBuf>,
    forced_skips: BTreeSet<String>,
}

impl RunContext {
    /// Build a context rooted at `root` from an explicit set of variables
    pub fn new<I, K, V>(root: impl Into<PathBuf>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let verbose = vars.get(VERBOSE_VAR).is_some_and(|v| is_truthy(v));
        let groups = vars.get(GROUPS_VAR).and_then(|v| parse_groups(v));
        let config_path = vars
            .get(CONFIG_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            root: root.into(),
            vars,
            verbose,
            groups,
            config_path,
            forced_skips: BTreeSet::new(),
        }
    }

    /// Build a context from the process environment
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self::new(root, std::env::vars())
    }

    /// Force verbose mode on (command-line flag)
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose |= verbose;
        self
    }

    /// Replace the group filter (command-line `--only` wins over the environment)
    pub fn with_groups(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.groups = parse_groups(raw);
        }
        self
    }

    /// Replace the override document path (command-line `--config`)
    pub fn with_config_path(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.into());
        }
        self
    }

    /// Fold the document-level toggles (`verbose`, `skip.*`) into the context
    pub fn apply_document(mut self, document: &OverrideDocument) -> Self {
        if document.verbose == Some(true) {
            self.verbose = true;
        }

        let skip = &document.skip;
        let switches = [
            (skip.pre_commit, HookKind::PreCommit.skip_flag().to_string()),
            (skip.pre_push, HookKind::PrePush.skip_flag().to_string()),
            (skip.commit_msg, HookKind::CommitMsg.skip_flag().to_string()),
            (skip.tests, skip_flag_name("Tests")),
            (skip.artifacts, skip_flag_name("Artifacts")),
        ];
        for (enabled, flag) in switches {
            if enabled {
                self.forced_skips.insert(flag);
            }
        }
        self
    }

    /// Repository work tree the tools run in
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn requested_groups(&self) -> Option<&BTreeSet<String>> {
        self.groups.as_ref()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Raw variable lookup
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `PATH` captured at startup
    pub fn search_path(&self) -> Option<OsString> {
        self.var("PATH").map(OsString::from)
    }

    /// Whether a flag is on, either through the environment or the override document
    pub fn flag(&self, key: &str) -> bool {
        self.forced_skips.contains(key) || self.var(key).is_some_and(is_truthy)
    }

    pub fn hook_skipped(&self, hook: HookKind) -> bool {
        self.flag(hook.skip_flag())
    }

    pub fn tool_skipped(&self, tool_name: &str) -> bool {
        self.flag(&skip_flag_name(tool_name))
    }

    /// Running inside the DDEV web container already
    pub fn in_container(&self) -> bool {
        self.var(IN_CONTAINER_VAR).is_some_and(is_truthy)
    }

    pub fn sandbox_disabled(&self) -> bool {
        self.flag(NO_SANDBOX_VAR)
    }
}
