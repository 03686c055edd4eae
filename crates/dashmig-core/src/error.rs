//! Error types for the rewrite engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// Fatal errors for a rewrite run.
///
/// A file that fails JSON validation after rewriting is *not* represented
/// here — the run continues past it, so it is recorded as a per-file
/// [`crate::rewrite::Outcome`] instead.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("dashboard directory not found: {}", .0.display())]
    MissingDir(PathBuf),

    #[error("no .json files found in dashboard directory: {}", .0.display())]
    NoDashboards(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
