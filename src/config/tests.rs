//! Override document and merge tests

use super::*;
use crate::error::ConfigError;
use crate::tools::builtin_tools;
use std::fs;
use tempfile::TempDir;

fn write_document(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn names(tools: &[ToolConfig]) -> Vec<&str> {
    tools.iter().map(|t| t.name.as_str()).collect()
}

fn small_catalog() -> Vec<ToolConfig> {
    vec![
        ToolConfig::new("Format", "prettier", LocationClass::LocalDependencyBin)
            .extensions([".ts"])
            .group(ToolGroup::Format),
        ToolConfig::new("Lint", "eslint", LocationClass::LocalDependencyBin)
            .extensions([".ts"])
            .group(ToolGroup::Lint),
    ]
}

#[test]
fn test_absent_document_returns_builtins_unchanged() {
    let dir = TempDir::new().unwrap();
    let context = RunContext::new(dir.path(), Vec::<(String, String)>::new());

    let source = OverrideSource::discover(&context).unwrap();
    assert!(source.path().is_none());

    let tools = load_effective_tools(builtin_tools(), &source).unwrap();
    assert_eq!(tools, builtin_tools());
}

#[test]
fn test_discover_prefers_first_default_document() {
    let dir = TempDir::new().unwrap();
    write_document(&dir, ".git-hooks.json", "{}");
    let yml = write_document(&dir, ".git-hooks.yml", "verbose: true");
    let context = RunContext::new(dir.path(), Vec::<(String, String)>::new());

    let source = OverrideSource::discover(&context).unwrap();
    assert_eq!(source.path(), Some(yml.as_path()));
}

#[test]
fn test_explicit_missing_document_is_an_error() {
    let dir = TempDir::new().unwrap();
    let context = RunContext::new(dir.path(), [("GIT_HOOKS_CONFIG", "missing.yml")]);

    let err = OverrideSource::discover(&context).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn test_disabled_builtin_is_removed() {
    // Scenario C: tools.Lint.enabled = false
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "tools:\n  Lint:\n    enabled: false\n");

    let tools = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap();
    assert_eq!(names(&tools), vec!["Format"]);
}

#[test]
fn test_disabling_every_builtin_never_leaks_a_name() {
    let mut overrides = BTreeMap::new();
    for tool in builtin_tools() {
        overrides.insert(
            tool.name.clone(),
            ToolOverride {
                enabled: Some(false),
                ..ToolOverride::default()
            },
        );
    }

    let merged = merge_overrides(builtin_tools(), &overrides).unwrap();
    assert!(merged.is_empty());
}

#[test]
fn test_field_level_merge_keeps_untouched_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        "hooks.yml",
        r#"
tools:
  PHPStan:
    args: ["analyse", "--level=8"]
    onFailure: stop
"#,
    );

    let tools = load_effective_tools(builtin_tools(), &OverrideSource::at(path)).unwrap();
    let phpstan = tools.iter().find(|t| t.name == "PHPStan").unwrap();
    let original = builtin_tools().into_iter().find(|t| t.name == "PHPStan").unwrap();

    assert_eq!(phpstan.args, vec!["analyse", "--level=8"]);
    assert_eq!(phpstan.on_failure, FailurePolicy::Stop);
    assert_eq!(phpstan.command, original.command);
    assert_eq!(phpstan.extensions, original.extensions);
    assert_eq!(phpstan.group, original.group);
    assert_eq!(tools.len(), builtin_tools().len(), "no duplicate entry");
}

#[test]
fn test_arrays_replace_instead_of_append() {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "Format".to_string(),
        ToolOverride {
            extensions: Some(vec![".vue".to_string(), ".vue".to_string()]),
            ..ToolOverride::default()
        },
    );

    let merged = merge_overrides(small_catalog(), &overrides).unwrap();
    assert_eq!(merged[0].extensions, vec![".vue"]);
}

#[test]
fn test_custom_tool_is_appended() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        "hooks.toml",
        r#"
[tools.Deptrac]
command = "deptrac"
locationClass = "project-dependency-bin"
args = ["analyse"]
passFiles = false
extensions = [".php"]
group = "Analysis"
"#,
    );

    let tools = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap();
    assert_eq!(names(&tools), vec!["Format", "Lint", "Deptrac"]);

    let deptrac = &tools[2];
    assert_eq!(deptrac.command, "deptrac");
    assert_eq!(deptrac.location_class, LocationClass::ProjectDependencyBin);
    assert!(!deptrac.pass_files);
    assert_eq!(deptrac.group, Some(ToolGroup::Analysis));
    assert_eq!(deptrac.hook, HookKind::PreCommit);
}

#[test]
fn test_custom_tool_without_command_is_rejected() {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "Mystery".to_string(),
        ToolOverride {
            location_class: Some(LocationClass::SystemPath),
            ..ToolOverride::default()
        },
    );

    let err = merge_overrides(small_catalog(), &overrides).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingField { field: "command", .. }
    ));
}

#[test]
fn test_custom_tool_without_location_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.json", r#"{"tools": {"Mystery": {"command": "x"}}}"#);

    let err = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingField { field: "locationClass", .. }
    ));
}

#[test]
fn test_disabled_custom_tool_needs_no_fields() {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        "Later".to_string(),
        ToolOverride {
            enabled: Some(false),
            ..ToolOverride::default()
        },
    );

    let merged = merge_overrides(small_catalog(), &overrides).unwrap();
    assert_eq!(names(&merged), vec!["Format", "Lint"]);
}

#[test]
fn test_document_that_is_not_a_mapping_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "- Lint\n- Format\n");

    let err = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_unknown_tool_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "tools:\n  Lint:\n    comand: eslint\n");

    let err = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_invalid_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "tools:\n  Lint:\n    extensions: [\"TS\"]\n");

    let err = load_effective_tools(small_catalog(), &OverrideSource::at(path)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidExtension { ref extension, .. } if extension == "TS"
    ));
}

#[test]
fn test_disabled_entry_with_stale_fields_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        "hooks.yml",
        "tools:\n  Legacy:\n    enabled: false\n    extensions: [\"TS\"]\n  Lint:\n    enabled: false\n    command: \"\"\n",
    );

    let source = OverrideSource::at(path);
    assert!(source.document().unwrap().is_some());
    let tools = load_effective_tools(small_catalog(), &source).unwrap();
    assert_eq!(names(&tools), vec!["Format"]);
}

#[test]
fn test_empty_document_counts_as_absent() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "\n  \n");

    let source = OverrideSource::at(path);
    assert!(source.document().unwrap().is_none());
    assert_eq!(load_effective_tools(small_catalog(), &source).unwrap(), small_catalog());
}

#[test]
fn test_document_is_read_once_per_source() {
    let dir = TempDir::new().unwrap();
    let path = write_document(&dir, "hooks.yml", "verbose: true\n");
    let source = OverrideSource::at(&path);

    let first = source.document().unwrap().cloned();
    fs::write(&path, "verbose: false\n").unwrap();
    let second = source.document().unwrap().cloned();

    assert_eq!(first, second);
    assert_eq!(second.unwrap().verbose, Some(true));
}

#[test]
fn test_skip_and_commit_sections_parse() {
    let dir = TempDir::new().unwrap();
    let path = write_document(
        &dir,
        "hooks.yml",
        r#"
verbose: true
skip:
  preCommit: true
  artifacts: true
commit:
  ticketIdPrefix: "PRJ|ERM"
  ticketNumberPattern: "[0-9]+"
"#,
    );

    let source = OverrideSource::at(path);
    let document = source.document().unwrap().unwrap();

    assert_eq!(document.verbose, Some(true));
    assert!(document.skip.pre_commit);
    assert!(document.skip.artifacts);
    assert!(!document.skip.tests);
    assert_eq!(document.commit.ticket_id_prefix.as_deref(), Some("PRJ|ERM"));
    assert!(document.commit.footer_label.is_none());
}

#[test]
fn test_effective_config_filters_by_hook_and_group() {
    let dir = TempDir::new().unwrap();
    let context = RunContext::new(dir.path(), [("GIT_HOOKS_ONLY", "FORMAT")]);
    let source = OverrideSource::discover(&context).unwrap();

    let effective =
        EffectiveRunConfig::build(HookKind::PreCommit, builtin_tools(), &source, context).unwrap();

    assert!(effective.tools.iter().all(|t| t.hook == HookKind::PreCommit));
    assert!(
        effective
            .tools
            .iter()
            .all(|t| t.group.is_none() || t.group == Some(ToolGroup::Format))
    );
    assert!(names(&effective.tools).contains(&"PHP Syntax"));
    assert!(names(&effective.tools).contains(&"ECS"));
    assert!(!names(&effective.tools).contains(&"PHPStan"));
}

#[test]
fn test_effective_config_applies_document_skips() {
    let dir = TempDir::new().unwrap();
    write_document(&dir, ".git-hooks.yml", "skip:\n  prePush: true\n");
    let context = RunContext::new(dir.path(), Vec::<(String, String)>::new());
    let source = OverrideSource::discover(&context).unwrap();

    let effective =
        EffectiveRunConfig::build(HookKind::PrePush, builtin_tools(), &source, context).unwrap();

    assert!(effective.hook_skipped());
    assert_eq!(names(&effective.tools), vec!["Tests", "Artifacts"]);
}
