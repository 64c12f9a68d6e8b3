//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Event payload errors.
    #[error(transparent)]
    Event(#[from] crate::event::EventError),

    /// Forge client construction, or fetching the merged pull request.
    #[error(transparent)]
    Forge(#[from] crate::forge::ForgeError),

    /// The temporary workspace could not be created.
    #[error("Failed to create workspace: {0}")]
    Workspace(#[source] std::io::Error),
}
