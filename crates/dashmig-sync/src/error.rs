//! Error types for the sync runner.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors for a sync run. Any of these aborts the remaining plan.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("expected local source directory not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed ({command}): exit code {code:?}")]
    CommandFailed {
        command: String,
        /// None when the process was terminated by a signal.
        code: Option<i32>,
    },
}

impl SyncError {
    /// Exit status the process should propagate: the failed command's
    /// own code when available, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::CommandFailed { code, .. } => code.unwrap_or(1),
            _ => 1,
        }
    }
}
