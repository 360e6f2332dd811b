//! Built-in tool catalog
//!
//! Tool order matters: auto-fixers run before the analyzers that should see
//! their output.

use super::{LocationClass, ToolConfig, ToolGroup};
use crate::hooks::HookKind;

const PHP: &[&str] = &[".php"];
const SCRIPTS: &[&str] = &[".js", ".jsx", ".ts", ".tsx", ".vue"];
const STYLES: &[&str] = &[".css", ".scss"];
const PRETTIER: &[&str] = &[
    ".js", ".jsx", ".ts", ".tsx", ".vue", ".json", ".css", ".scss", ".md", ".yml", ".yaml",
];

/// The default catalog for all hooks, in execution order
pub fn builtin_tools() -> Vec<ToolConfig> {
    use LocationClass::{LocalDependencyBin, ProjectDependencyBin, SystemPath};

    vec![
        // pre-commit
        ToolConfig::new("PHP Syntax", "php", SystemPath)
            .args(["-l"])
            .extensions(PHP.iter().copied())
            .per_file()
            .stop_on_failure(),
        ToolConfig::new("ECS", "ecs", ProjectDependencyBin)
            .args(["check", "--fix", "--no-progress-bar"])
            .extensions(PHP.iter().copied())
            .group(ToolGroup::Format)
            .restage(),
        ToolConfig::new("Rector", "rector", ProjectDependencyBin)
            .args(["process", "--no-progress-bar"])
            .extensions(PHP.iter().copied())
            .group(ToolGroup::Refactor)
            .restage(),
        ToolConfig::new("PHPStan", "phpstan", ProjectDependencyBin)
            .args(["analyse", "--no-progress", "--memory-limit=1G"])
            .extensions(PHP.iter().copied())
            .group(ToolGroup::Analysis),
        ToolConfig::new("Psalm", "psalm", ProjectDependencyBin)
            .alternatives(["psalm.phar"])
            .args(["--no-progress", "--show-info=false"])
            .extensions(PHP.iter().copied())
            .group(ToolGroup::Analysis),
        ToolConfig::new("Prettier", "prettier", LocalDependencyBin)
            .args(["--write", "--ignore-unknown"])
            .extensions(PRETTIER.iter().copied())
            .group(ToolGroup::Format)
            .restage(),
        ToolConfig::new("ESLint", "eslint", LocalDependencyBin)
            .args(["--fix"])
            .extensions(SCRIPTS.iter().copied())
            .group(ToolGroup::Lint)
            .restage(),
        ToolConfig::new("Stylelint", "stylelint", LocalDependencyBin)
            .args(["--fix"])
            .extensions(STYLES.iter().copied())
            .group(ToolGroup::Lint)
            .restage(),
        // commit-msg: the message file is the only candidate
        ToolConfig::new("Commitlint", "commitlint", LocalDependencyBin)
            .for_hook(HookKind::CommitMsg)
            .args(["--edit"])
            .stop_on_failure(),
        // pre-push
        ToolConfig::new("Tests", "phpunit", ProjectDependencyBin)
            .for_hook(HookKind::PrePush)
            .alternatives(["pest"])
            .args(["--no-coverage"])
            .without_files()
            .stop_on_failure(),
        ToolConfig::new("Artifacts", "openapi", ProjectDependencyBin)
            .for_hook(HookKind::PrePush)
            .args(["src", "--output", "documentation/openapi.yml"])
            .without_files(),
    ]
}
