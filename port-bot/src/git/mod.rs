//! Local git operations used by the port workflow.
//!
//! [`VersionControlClient`] is the seam between the port state machine and
//! the working copy. [`GitCli`] implements it by shelling out to `git`; the
//! in-memory [`ScriptedGit`](crate::fakes::ScriptedGit) implements it for
//! tests.

mod cli;
mod error;

pub use cli::GitCli;
pub use error::GitError;

use crate::config::BotIdentity;
use crate::types::Repository;
use async_trait::async_trait;
use std::path::Path;

/// How a working copy was made available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    /// A fresh clone was made.
    Cloned,
    /// An existing working copy was reused.
    Reused,
}

/// Result of a cherry-pick that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickOutcome {
    /// The commit applied without conflicts and is committed.
    Clean,
    /// The commit left unmerged paths in the working tree.
    Conflicted {
        /// Paths git reports as unmerged.
        files: Vec<String>,
    },
}

/// Capability: shell-level git operations on a working copy.
///
/// Every method takes the working-copy directory explicitly so callers decide
/// whether copies are shared or isolated.
#[async_trait]
pub trait VersionControlClient: Send + Sync {
    /// Makes sure `dir` holds a clone of `repository`.
    ///
    /// A directory that already contains a working copy is reused. The bot
    /// identity is configured as the local committer either way.
    async fn ensure_clone(
        &self,
        repository: &Repository,
        dir: &Path,
        identity: &BotIdentity,
    ) -> Result<CloneStatus, GitError>;

    /// Runs `git fetch origin`.
    async fn fetch(&self, dir: &Path) -> Result<(), GitError>;

    /// Checks out `branch`, resetting any local copy to `origin/{branch}`.
    async fn checkout(&self, dir: &Path, branch: &str) -> Result<(), GitError>;

    /// Cherry-picks `sha` against its first parent.
    ///
    /// Failures that leave unmerged paths are reported as
    /// [`CherryPickOutcome::Conflicted`]; every other failure is an error.
    async fn cherry_pick(&self, dir: &Path, sha: &str) -> Result<CherryPickOutcome, GitError>;

    /// Abandons an in-progress cherry-pick.
    async fn abort_cherry_pick(&self, dir: &Path) -> Result<(), GitError>;

    /// Rewrites the author of `HEAD` without touching its message.
    async fn amend_author(&self, dir: &Path, identity: &BotIdentity) -> Result<(), GitError>;

    /// Stages the whole working tree as-is and commits it.
    async fn commit_all(
        &self,
        dir: &Path,
        identity: &BotIdentity,
        message: &str,
    ) -> Result<(), GitError>;

    /// Pushes `branch` to `origin`.
    async fn push(&self, dir: &Path, branch: &str) -> Result<(), GitError>;

    /// Makes a working copy usable again after an interrupted operation.
    ///
    /// Removes a stale index lock and abandons any in-progress cherry-pick.
    /// A directory without a working copy is left alone.
    async fn recover(&self, dir: &Path) -> Result<(), GitError>;
}
