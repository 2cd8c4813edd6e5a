// ============================================================================
// vidtoolz-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// Core failures pass through unchanged as `CliError::Core`. The remaining
// variants belong to the plugin registry and the dispatcher.
//
// KEY COMPONENTS:
// - CliError / CliResult: error type and alias for CLI operations
// - CliErrorContext: attach context to Result and Option values
// - cli_error!: build an ad-hoc CliError from a format string

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vidtoolz_core::CoreError;

/// Errors raised by the registry, the dispatcher and the built-in commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Two providers registered the same subcommand name.
    #[error("Subcommand '{name}' is already registered (by {owner})")]
    DuplicateCommand { name: String, owner: String },

    #[error("Failed to read plugin manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("Failed to load plugin '{provider}': {reason}")]
    ProviderLoad { provider: String, reason: String },

    #[error("{0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit status for errors that escape the dispatcher.
    ///
    /// Registry conflicts are configuration errors and share the usage
    /// status of the argument parser.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::DuplicateCommand { .. } => 2,
            _ => 1,
        }
    }
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;

/// Extension trait for adding context to errors in the CLI.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CliError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Failed(format!("{}: {}", context, err))
        })
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Failed(format!("{}: {}", f(), err))
        })
    }
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.ok_or_else(|| CliError::Failed(context.to_string()))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| CliError::Failed(f().to_string()))
    }
}

/// Creates a CLI error with a formatted message.
#[macro_export]
macro_rules! cli_error {
    ($($arg:tt)*) => {
        $crate::error::CliError::Failed(format!($($arg)*))
    };
}
