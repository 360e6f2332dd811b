//! # booster-hooks - rule-driven git hooks for PHP/JS projects
//!
//! booster-hooks runs a declarative catalog of quality tools (formatters,
//! linters, static analyzers) from git hooks:
//!
//! - **Declarative catalog**: every tool is a [`tools::ToolConfig`] entry with its
//!   command, fallback binaries, file extensions and failure policy
//! - **Per-project overrides**: a `.git-hooks.yml` (or TOML/JSON) document can
//!   disable, tweak or add tools
//! - **Selective runs**: `GIT_HOOKS_ONLY=format` narrows a run to tool groups
//! - **DDEV aware**: tools run inside the project's DDEV container when one is
//!   available
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the hook shims into .git/hooks
//! booster-hooks install
//!
//! # Run the pre-commit tools by hand
//! booster-hooks run pre-commit
//!
//! # Only run formatters, skip PHPStan
//! GIT_HOOKS_ONLY=format SKIP_PHPSTAN=1 git commit
//! ```
//!
//! ## Override Document
//!
//! ```yaml
//! verbose: true
//! skip:
//!   tests: true
//! tools:
//!   Psalm:
//!     enabled: false
//!   PHPStan:
//!     args: ["analyse", "--level=8"]
//!   Deptrac:
//!     command: deptrac
//!     locationClass: project-dependency-bin
//!     extensions: [".php"]
//!     passFiles: false
//!     group: analysis
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod external;
pub mod git;
pub mod hooks;
pub mod tools;

pub use cli::{Cli, Output};
pub use context::RunContext;
pub use error::ConfigError;

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
