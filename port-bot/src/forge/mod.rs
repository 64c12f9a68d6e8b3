//! Remote code-hosting operations used by the bot.
//!
//! [`ForgeClient`] covers exactly the calls the port workflow and the review
//! chores make. [`GitHubForge`] implements it with `octocrab`.

mod error;
mod github;

pub use error::ForgeError;
pub use github::GitHubForge;

use crate::types::{PullRequestRef, Repository};
use async_trait::async_trait;
use serde::Serialize;

/// Parameters for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Pull request title.
    pub title: String,

    /// Branch holding the changes.
    pub head: String,

    /// Branch the changes are proposed for.
    pub base: String,

    /// Markdown body.
    pub body: String,

    /// Whether the pull request is opened as a draft.
    pub draft: bool,
}

/// A pull request the forge accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPullRequest {
    /// Pull request number.
    pub number: u64,

    /// Web URL of the pull request.
    pub url: String,
}

/// Reviewers requested on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestedReviewers {
    /// User logins.
    pub users: Vec<String>,

    /// Team slugs.
    pub teams: Vec<String>,
}

impl RequestedReviewers {
    /// Returns true when nobody is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.teams.is_empty()
    }
}

/// Capability: the forge API calls made by the bot.
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// Returns the commit SHA a branch points at, or `None` if it does not exist.
    async fn branch_head(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> Result<Option<String>, ForgeError>;

    /// Creates `refs/heads/{branch}` pointing at `sha`.
    async fn create_branch(
        &self,
        repository: &Repository,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError>;

    /// Fetches a pull request snapshot.
    async fn pull_request(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<PullRequestRef, ForgeError>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        repository: &Repository,
        pull_request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ForgeError>;

    /// Lists the users and teams currently requested to review a pull request.
    async fn requested_reviewers(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<RequestedReviewers, ForgeError>;

    /// Requests reviews from users and teams.
    async fn request_reviewers(
        &self,
        repository: &Repository,
        number: u64,
        reviewers: &RequestedReviewers,
    ) -> Result<(), ForgeError>;

    /// Adds labels to an issue or pull request.
    async fn add_labels(
        &self,
        repository: &Repository,
        number: u64,
        labels: &[String],
    ) -> Result<(), ForgeError>;

    /// Posts a comment on an issue or pull request.
    async fn create_comment(
        &self,
        repository: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), ForgeError>;
}
