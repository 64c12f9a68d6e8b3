//! Shared repository and pull request types.

use serde::Serialize;
use std::fmt;

/// A repository on the forge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Repository {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl Repository {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Full repository name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Snapshot of a merged pull request, taken when the merge event is handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    /// Repository the pull request belongs to.
    pub repository: Repository,

    /// Pull request number.
    pub number: u64,

    /// SHA of the commit the merge produced on the base branch.
    pub merge_commit_sha: String,

    /// Pull request title.
    pub title: String,

    /// Login of the pull request author.
    pub author: String,

    /// Label names, in the order the forge reports them.
    pub labels: Vec<String>,
}
