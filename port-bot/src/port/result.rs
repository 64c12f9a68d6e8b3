//! Port result types.

use super::{PortErrorKind, WorkingBranch};

/// A port that opened its pull request.
#[derive(Debug)]
pub struct PortResult {
    /// Number of the new pull request.
    pub new_pr_number: u64,

    /// Web URL of the new pull request.
    pub new_pr_url: String,

    /// Branch the new pull request was opened from.
    pub working_branch: WorkingBranch,

    /// Whether the cherry-pick left conflicts, committed as-is.
    pub had_conflict: bool,

    /// Paths that were unmerged after the cherry-pick.
    pub conflicted_files: Vec<String>,

    /// Post-creation steps that failed. The port still counts as done.
    pub follow_up_failures: Vec<PortErrorKind>,
}

impl PortResult {
    /// Returns true when the port applied cleanly and every follow-up step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.had_conflict && self.follow_up_failures.is_empty()
    }
}
