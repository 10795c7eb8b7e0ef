//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Walk failures never escape the walk: they are turned into error leaves
/// using this type's `Display` output.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A failure reported by the directory walk: an unlistable directory,
    /// an unreadable entry or a symlink loop.
    #[error("{0}")]
    Walk(#[from] walkdir::Error),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is often due to a task panicking or being cancelled.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),
}
