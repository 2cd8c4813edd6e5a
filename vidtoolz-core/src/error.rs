// ============================================================================
// vidtoolz-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the vidtoolz core library
//
// Every fallible operation in the core returns `CoreResult<T>`. A non-zero
// exit code from ffmpeg is NOT an error here: it is reported through
// `ProcessOutput`/`Outcome` so the caller can print the captured log.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while validating parameters or launching external tools.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Input file {} not found.", .0.display())]
    InputNotFound(PathBuf),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid time value '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Error waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to download ffmpeg: {0}")]
    Download(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias used throughout the core library.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CoreError::CommandStart` for the named program.
pub(crate) fn command_start_error(program: impl Into<String>, err: io::Error) -> CoreError {
    let program = program.into();
    if err.kind() == io::ErrorKind::NotFound {
        log::warn!("Executable '{}' not found on PATH", program);
    }
    CoreError::CommandStart(program, err)
}

impl CoreError {
    /// True for problems with what the user asked for (bad value, missing
    /// file), as opposed to failures while running a tool.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CoreError::InputNotFound(_) | CoreError::InvalidInput(_) | CoreError::InvalidTime { .. }
        )
    }
}
