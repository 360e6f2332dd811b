//! Selective execution gate (`GIT_HOOKS_ONLY`, `--only`)

use crate::tools::{ToolConfig, ToolGroup};
use std::collections::BTreeSet;

/// Keep the tools whose group was requested plus every ungrouped tool.
///
/// Ungrouped tools are mandatory gates (the PHP syntax check, for example) and
/// survive any filter. `None` or an empty set disables filtering.
pub fn filter_by_groups(
    tools: Vec<ToolConfig>,
    requested: Option<&BTreeSet<String>>,
) -> Vec<ToolConfig> {
    let Some(requested) = requested.filter(|r| !r.is_empty()) else {
        return tools;
    };

    tools
        .into_iter()
        .filter(|tool| match tool.group {
            None => true,
            Some(group) => requested
                .iter()
                .any(|name| name.trim().eq_ignore_ascii_case(group.as_str())),
        })
        .collect()
}

/// Requested names that match no known group
pub fn unknown_groups(requested: &BTreeSet<String>) -> Vec<&str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|name| ToolGroup::parse(name).is_none())
        .collect()
}
