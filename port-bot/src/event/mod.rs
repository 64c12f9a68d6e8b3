//! `pull_request` webhook payloads.
//!
//! Only the fields the bot dispatches on are read; the pull request itself is
//! fetched from the forge afterwards.

mod error;

pub use error::EventError;

use crate::types::Repository;
use serde::Deserialize;
use std::path::Path;

/// What the bot should do about an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventAction {
    /// A pull request was opened.
    Opened,
    /// A pull request was closed by merging it.
    Merged,
    /// A pull request was closed without merging.
    ClosedUnmerged,
    /// New commits were pushed to a pull request.
    Synchronize,
    /// Any other action.
    Other(String),
}

/// Subset of a `pull_request` webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    /// Raw action name.
    pub action: String,

    /// Pull request number.
    pub number: u64,

    /// Pull request state at the time of the event.
    pub pull_request: EventPullRequest,

    /// Repository the event belongs to.
    pub repository: EventRepository,
}

/// Pull request fields of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPullRequest {
    /// Whether the pull request was merged.
    #[serde(default)]
    pub merged: bool,
}

/// Repository fields of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    /// Repository name.
    pub name: String,

    /// Repository owner.
    pub owner: EventOwner,
}

/// Owner fields of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EventOwner {
    /// Owner login.
    pub login: String,
}

impl PullRequestEvent {
    /// Parses a payload.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Parse`] if required fields are missing or mistyped.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a payload file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, EventError> {
        let json = std::fs::read_to_string(path).map_err(|source| EventError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Classifies the event.
    #[must_use]
    pub fn action(&self) -> EventAction {
        match self.action.as_str() {
            "opened" => EventAction::Opened,
            "closed" if self.pull_request.merged => EventAction::Merged,
            "closed" => EventAction::ClosedUnmerged,
            "synchronize" => EventAction::Synchronize,
            other => EventAction::Other(other.to_string()),
        }
    }

    /// Repository the event belongs to.
    #[must_use]
    pub fn repository(&self) -> Repository {
        Repository::new(&self.repository.owner.login, &self.repository.name)
    }
}
