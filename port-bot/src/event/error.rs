//! Event payload error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading a webhook payload.
#[derive(Debug, Error)]
pub enum EventError {
    /// Failed to read the payload file.
    #[error("Failed to read event payload at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not a `pull_request` event.
    #[error("Malformed pull_request event payload: {0}")]
    Parse(#[from] serde_json::Error),
}
