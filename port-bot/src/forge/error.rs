//! Forge error types.

use thiserror::Error;

/// Errors that can occur while talking to the forge API.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The forge returned an object missing a field the bot relies on.
    #[error("{what} is missing {field}")]
    MissingField { what: String, field: &'static str },

    /// The forge rejected or failed the request for another reason.
    #[error("{0}")]
    Rejected(String),
}
