//! Error types shared across the runner

use std::path::PathBuf;

/// A malformed override document or an invalid tool definition.
///
/// Configuration errors are fatal: the hook refuses to start any tool.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("override document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read override document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid override document {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("custom tool '{name}' must define '{field}'")]
    MissingField { name: String, field: &'static str },

    #[error("tool '{name}' has an empty command")]
    EmptyCommand { name: String },

    #[error(
        "tool '{name}' has invalid extension '{extension}' (expected a lowercase suffix with a leading dot)"
    )]
    InvalidExtension { name: String, extension: String },

    #[error("invalid ticket pattern '{pattern}': {source}")]
    TicketPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to launch an external binary at all (as opposed to the binary
/// running and exiting non-zero).
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
