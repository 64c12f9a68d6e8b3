//! Port error types.

use crate::forge::ForgeError;
use crate::git::GitError;
use thiserror::Error;

/// Boxed error for steps that can fail either rendering or calling the forge.
pub type StepError = Box<dyn std::error::Error + Send + Sync>;

/// Classified reason a port step failed.
///
/// Variants up to [`PrCreateFailed`](Self::PrCreateFailed) abort the port.
/// The later ones are only ever recorded as follow-up failures of a port
/// that already opened its pull request.
#[derive(Debug, Error)]
pub enum PortErrorKind {
    /// Looking up a branch ref on the forge failed.
    #[error("failed to look up branch ref: {source}")]
    RefLookupFailed {
        #[source]
        source: ForgeError,
    },

    /// The target branch does not exist.
    #[error("target branch {branch} does not exist")]
    RefNotFound { branch: String },

    /// The working branch exists and has moved past the target tip.
    #[error("working branch {branch} already exists at {existing_sha}")]
    RefAlreadyExists { branch: String, existing_sha: String },

    /// Creating the working branch ref failed.
    #[error("failed to create working branch: {source}")]
    RefCreateFailed {
        #[source]
        source: ForgeError,
    },

    /// Cloning the repository failed.
    #[error("failed to clone repository: {source}")]
    CloneFailed {
        #[source]
        source: GitError,
    },

    /// Fetching from origin failed.
    #[error("failed to fetch: {source}")]
    FetchFailed {
        #[source]
        source: GitError,
    },

    /// Checking out the working branch failed.
    #[error("failed to check out working branch: {source}")]
    CheckoutFailed {
        #[source]
        source: GitError,
    },

    /// Cherry-pick failed for a reason other than a merge conflict.
    #[error("cherry-pick failed: {source}")]
    CherryPickFailed {
        #[source]
        source: GitError,
    },

    /// Committing the cherry-picked change failed.
    #[error("failed to commit: {source}")]
    CommitFailed {
        #[source]
        source: GitError,
    },

    /// Pushing the working branch failed.
    #[error("failed to push working branch: {source}")]
    PushFailed {
        #[source]
        source: GitError,
    },

    /// Opening the pull request failed.
    #[error("failed to open pull request: {source}")]
    PrCreateFailed {
        #[source]
        source: StepError,
    },

    /// Labelling the new pull request failed.
    #[error("failed to apply labels: {source}")]
    LabelApplyFailed {
        #[source]
        source: ForgeError,
    },

    /// Posting the conflict comment failed.
    #[error("failed to post conflict comment: {source}")]
    CommentFailed {
        #[source]
        source: StepError,
    },

    /// Reading the original pull request's reviewers failed.
    #[error("failed to list requested reviewers: {source}")]
    ReviewerListFailed {
        #[source]
        source: ForgeError,
    },

    /// Requesting reviewers on the new pull request failed.
    #[error("failed to request reviewers: {source}")]
    ReviewerRequestFailed {
        #[source]
        source: ForgeError,
    },

    /// The port did not finish within its deadline.
    #[error("port did not finish within {timeout_secs} seconds")]
    DeadlineExceeded { timeout_secs: u64 },
}

impl PortErrorKind {
    /// Stable name of the classification, for logs and summaries.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RefLookupFailed { .. } => "RefLookupFailed",
            Self::RefNotFound { .. } => "RefNotFound",
            Self::RefAlreadyExists { .. } => "RefAlreadyExists",
            Self::RefCreateFailed { .. } => "RefCreateFailed",
            Self::CloneFailed { .. } => "CloneFailed",
            Self::FetchFailed { .. } => "FetchFailed",
            Self::CheckoutFailed { .. } => "CheckoutFailed",
            Self::CherryPickFailed { .. } => "CherryPickFailed",
            Self::CommitFailed { .. } => "CommitFailed",
            Self::PushFailed { .. } => "PushFailed",
            Self::PrCreateFailed { .. } => "PrCreateFailed",
            Self::LabelApplyFailed { .. } => "LabelApplyFailed",
            Self::CommentFailed { .. } => "CommentFailed",
            Self::ReviewerListFailed { .. } => "ReviewerListFailed",
            Self::ReviewerRequestFailed { .. } => "ReviewerRequestFailed",
            Self::DeadlineExceeded { .. } => "DeadlineExceeded",
        }
    }
}

/// A port that did not reach the point of opening its pull request.
#[derive(Debug, Error)]
#[error("port of #{pr_number} to {target_branch} failed: {kind}")]
pub struct PortError {
    /// Number of the merged pull request.
    pub pr_number: u64,

    /// Branch the port targeted.
    pub target_branch: String,

    /// What went wrong.
    #[source]
    pub kind: PortErrorKind,
}
