//! Git error types.

use thiserror::Error;

/// Errors raised while driving the `git` binary.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started.
    #[error("Failed to execute git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The git process exited unsuccessfully.
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A local filesystem operation around git failed.
    #[error("Failed to prepare '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
