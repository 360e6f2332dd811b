//! Tool catalog tests

use super::*;
use std::collections::HashSet;

#[test]
fn test_builtin_names_are_unique() {
    let tools = builtin_tools();
    let names: HashSet<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), tools.len());
}

#[test]
fn test_builtin_extensions_are_lowercase_suffixes() {
    for tool in builtin_tools() {
        for ext in &tool.extensions {
            assert!(ext.starts_with('.'), "{}: {ext}", tool.name);
            assert_eq!(ext, &ext.to_lowercase(), "{}: {ext}", tool.name);
        }
    }
}

#[test]
fn test_builtin_skip_flags_match_documented_names() {
    let tools = builtin_tools();
    let flags: Vec<String> = tools.iter().map(ToolConfig::skip_flag).collect();

    assert!(flags.contains(&"SKIP_PHPSTAN".to_string()));
    assert!(flags.contains(&"SKIP_PSALM".to_string()));
    assert!(flags.contains(&"SKIP_PHP_SYNTAX".to_string()));
    assert!(flags.contains(&"SKIP_TESTS".to_string()));
    assert!(flags.contains(&"SKIP_ARTIFACTS".to_string()));
}

#[test]
fn test_syntax_check_is_an_ungrouped_gate() {
    let tools = builtin_tools();
    let syntax = tools.iter().find(|t| t.name == "PHP Syntax").unwrap();

    assert!(syntax.group.is_none());
    assert!(syntax.run_per_file);
    assert_eq!(syntax.on_failure, FailurePolicy::Stop);
    assert_eq!(tools[0].name, "PHP Syntax", "syntax check runs first");
}

#[test]
fn test_fixers_run_before_analyzers() {
    let tools = builtin_tools();
    let position = |name: &str| tools.iter().position(|t| t.name == name).unwrap();

    assert!(position("ECS") < position("PHPStan"));
    assert!(position("Rector") < position("PHPStan"));
}

#[test]
fn test_builder_defaults() {
    let tool = ToolConfig::new("Custom", "custom", LocationClass::SystemPath);

    assert_eq!(tool.hook, HookKind::PreCommit);
    assert!(tool.pass_files);
    assert!(!tool.run_per_file);
    assert!(!tool.stages_files_after);
    assert_eq!(tool.on_failure, FailurePolicy::Continue);
    assert!(tool.group.is_none());
    assert!(!tool.has_extension_filter());
}

#[test]
fn test_candidates_keep_order() {
    let tool = ToolConfig::new("Psalm", "psalm", LocationClass::ProjectDependencyBin)
        .alternatives(["psalm.phar", "psalm-legacy"]);

    assert_eq!(
        tool.candidates().collect::<Vec<_>>(),
        vec!["psalm", "psalm.phar", "psalm-legacy"]
    );
}

#[test]
fn test_accepts_matches_suffix_case_sensitively() {
    let tool = ToolConfig::new("Lint", "eslint", LocationClass::LocalDependencyBin)
        .extensions([".ts", ".blade.php"]);

    assert!(tool.accepts("src/a.ts"));
    assert!(tool.accepts("views/home.blade.php"));
    assert!(!tool.accepts("src/A.TS"));
    assert!(!tool.accepts("README.md"));
    assert!(!tool.accepts("Makefile"));
    assert!(!tool.accepts("dir.ts/file"));
    assert!(!tool.accepts(".ts"));
}

#[test]
fn test_group_parsing_is_case_insensitive() {
    assert_eq!(ToolGroup::parse("FORMAT"), Some(ToolGroup::Format));
    assert_eq!(ToolGroup::parse(" analysis "), Some(ToolGroup::Analysis));
    assert_eq!(ToolGroup::parse("formatting"), None);
    assert!(ToolGroup::try_from("Lint".to_string()).is_ok());
    assert!(ToolGroup::try_from("style".to_string()).is_err());
}

#[test]
fn test_location_bin_dirs() {
    assert_eq!(LocationClass::LocalDependencyBin.bin_dir(), Some("node_modules/.bin"));
    assert_eq!(LocationClass::ProjectDependencyBin.bin_dir(), Some("vendor/bin"));
    assert_eq!(LocationClass::SystemPath.bin_dir(), None);
}
