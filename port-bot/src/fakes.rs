//! In-memory fakes for the client traits.
//!
//! [`MemoryForge`] stands in for a single hosted repository and
//! [`ScriptedGit`] for a working copy whose cherry-picks are scripted per
//! commit. Both record every call and can be told to fail specific
//! operations.

use crate::config::BotIdentity;
use crate::forge::{
    CreatedPullRequest, ForgeClient, ForgeError, NewPullRequest, RequestedReviewers,
};
use crate::git::{CherryPickOutcome, CloneStatus, GitError, VersionControlClient};
use crate::types::{PullRequestRef, Repository};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// MemoryForge
// ---------------------------------------------------------------------------

/// Forge calls [`MemoryForge`] records and can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForgeOperation {
    BranchHead,
    CreateBranch,
    PullRequest,
    CreatePullRequest,
    RequestedReviewers,
    RequestReviewers,
    AddLabels,
    CreateComment,
}

#[derive(Debug)]
struct ForgeState {
    branches: HashMap<String, String>,
    pull_requests: HashMap<u64, PullRequestRef>,
    requested_reviewers: HashMap<u64, RequestedReviewers>,
    next_number: u64,
    created: Vec<(u64, NewPullRequest)>,
    labels: HashMap<u64, Vec<String>>,
    comments: HashMap<u64, Vec<String>>,
    review_requests: HashMap<u64, Vec<RequestedReviewers>>,
    failing: HashSet<ForgeOperation>,
    failing_branches: HashSet<String>,
    calls: Vec<ForgeOperation>,
}

impl Default for ForgeState {
    fn default() -> Self {
        Self {
            branches: HashMap::new(),
            pull_requests: HashMap::new(),
            requested_reviewers: HashMap::new(),
            next_number: 1000,
            created: Vec::new(),
            labels: HashMap::new(),
            comments: HashMap::new(),
            review_requests: HashMap::new(),
            failing: HashSet::new(),
            failing_branches: HashSet::new(),
            calls: Vec::new(),
        }
    }
}

/// In-memory forge for a single repository.
///
/// New pull requests are numbered from 1000 upwards.
#[derive(Debug, Default)]
pub struct MemoryForge {
    state: Mutex<ForgeState>,
}

impl MemoryForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a branch pointing at `sha`.
    pub fn with_branch(self, branch: &str, sha: &str) -> Self {
        lock(&self.state)
            .branches
            .insert(branch.to_string(), sha.to_string());
        self
    }

    /// Adds a pull request that [`ForgeClient::pull_request`] returns.
    pub fn with_pull_request(self, pr: PullRequestRef) -> Self {
        lock(&self.state).pull_requests.insert(pr.number, pr);
        self
    }

    /// Sets the reviewers requested on an existing pull request.
    pub fn with_requested_reviewers(self, number: u64, reviewers: RequestedReviewers) -> Self {
        lock(&self.state)
            .requested_reviewers
            .insert(number, reviewers);
        self
    }

    /// Makes every call of `operation` fail.
    pub fn fail_on(self, operation: ForgeOperation) -> Self {
        lock(&self.state).failing.insert(operation);
        self
    }

    /// Makes lookups of one branch fail.
    pub fn fail_lookup_of(self, branch: &str) -> Self {
        lock(&self.state).failing_branches.insert(branch.to_string());
        self
    }

    /// SHA a branch points at.
    pub fn branch(&self, branch: &str) -> Option<String> {
        lock(&self.state).branches.get(branch).cloned()
    }

    /// Pull requests opened so far, with their numbers, in order.
    pub fn created_pull_requests(&self) -> Vec<(u64, NewPullRequest)> {
        lock(&self.state).created.clone()
    }

    /// Labels added to a pull request.
    pub fn labels(&self, number: u64) -> Vec<String> {
        lock(&self.state)
            .labels
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    /// Comments posted on a pull request.
    pub fn comments(&self, number: u64) -> Vec<String> {
        lock(&self.state)
            .comments
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    /// Review requests made on a pull request.
    pub fn review_requests(&self, number: u64) -> Vec<RequestedReviewers> {
        lock(&self.state)
            .review_requests
            .get(&number)
            .cloned()
            .unwrap_or_default()
    }

    /// Every call made, in order.
    pub fn calls(&self) -> Vec<ForgeOperation> {
        lock(&self.state).calls.clone()
    }

    /// Records a call and returns the state, or an error if the call is set to fail.
    fn enter(&self, operation: ForgeOperation) -> Result<MutexGuard<'_, ForgeState>, ForgeError> {
        let mut state = lock(&self.state);
        state.calls.push(operation);
        if state.failing.contains(&operation) {
            return Err(ForgeError::Rejected(format!("{operation:?} failed")));
        }
        Ok(state)
    }
}

#[async_trait]
impl ForgeClient for MemoryForge {
    async fn branch_head(
        &self,
        _repository: &Repository,
        branch: &str,
    ) -> Result<Option<String>, ForgeError> {
        let state = self.enter(ForgeOperation::BranchHead)?;
        if state.failing_branches.contains(branch) {
            return Err(ForgeError::Rejected(format!("lookup of {branch} failed")));
        }
        Ok(state.branches.get(branch).cloned())
    }

    async fn create_branch(
        &self,
        _repository: &Repository,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let mut state = self.enter(ForgeOperation::CreateBranch)?;
        if state.branches.contains_key(branch) {
            return Err(ForgeError::Rejected(format!(
                "Reference refs/heads/{branch} already exists"
            )));
        }
        state.branches.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn pull_request(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<PullRequestRef, ForgeError> {
        let state = self.enter(ForgeOperation::PullRequest)?;
        state
            .pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| ForgeError::Rejected(format!("{repository}#{number} not found")))
    }

    async fn create_pull_request(
        &self,
        repository: &Repository,
        pull_request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ForgeError> {
        let mut state = self.enter(ForgeOperation::CreatePullRequest)?;
        let number = state.next_number;
        state.next_number += 1;
        state.created.push((number, pull_request.clone()));
        Ok(CreatedPullRequest {
            number,
            url: format!("https://github.com/{}/pull/{number}", repository.full_name()),
        })
    }

    async fn requested_reviewers(
        &self,
        _repository: &Repository,
        number: u64,
    ) -> Result<RequestedReviewers, ForgeError> {
        let state = self.enter(ForgeOperation::RequestedReviewers)?;
        Ok(state
            .requested_reviewers
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn request_reviewers(
        &self,
        _repository: &Repository,
        number: u64,
        reviewers: &RequestedReviewers,
    ) -> Result<(), ForgeError> {
        let mut state = self.enter(ForgeOperation::RequestReviewers)?;
        state
            .review_requests
            .entry(number)
            .or_default()
            .push(reviewers.clone());
        Ok(())
    }

    async fn add_labels(
        &self,
        _repository: &Repository,
        number: u64,
        labels: &[String],
    ) -> Result<(), ForgeError> {
        let mut state = self.enter(ForgeOperation::AddLabels)?;
        state
            .labels
            .entry(number)
            .or_default()
            .extend(labels.iter().cloned());
        Ok(())
    }

    async fn create_comment(
        &self,
        _repository: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), ForgeError> {
        let mut state = self.enter(ForgeOperation::CreateComment)?;
        state
            .comments
            .entry(number)
            .or_default()
            .push(body.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedGit
// ---------------------------------------------------------------------------

/// Git operations [`ScriptedGit`] records and can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitOperation {
    Clone,
    Fetch,
    Checkout,
    CherryPick,
    AbortCherryPick,
    AmendAuthor,
    CommitAll,
    Push,
    Recover,
}

#[derive(Debug, Default)]
struct GitState {
    cloned: HashSet<PathBuf>,
    conflicts: HashMap<String, Vec<String>>,
    failing: HashSet<GitOperation>,
    calls: Vec<GitOperation>,
    dirs: Vec<PathBuf>,
    commit_messages: Vec<String>,
    pushed: Vec<String>,
    recovered: Vec<PathBuf>,
}

/// Working copy whose cherry-picks succeed unless scripted otherwise.
#[derive(Debug, Default)]
pub struct ScriptedGit {
    state: Mutex<GitState>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes cherry-picks of `sha` conflict on `files`.
    pub fn conflict_on(self, sha: &str, files: &[&str]) -> Self {
        lock(&self.state).conflicts.insert(
            sha.to_string(),
            files.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Makes every call of `operation` fail.
    pub fn fail_on(self, operation: GitOperation) -> Self {
        lock(&self.state).failing.insert(operation);
        self
    }

    /// Every call made, in order.
    pub fn calls(&self) -> Vec<GitOperation> {
        lock(&self.state).calls.clone()
    }

    /// Working-copy directories passed to `ensure_clone`, in order.
    pub fn clone_dirs(&self) -> Vec<PathBuf> {
        lock(&self.state).dirs.clone()
    }

    /// Messages of commits made by `commit_all`.
    pub fn commit_messages(&self) -> Vec<String> {
        lock(&self.state).commit_messages.clone()
    }

    /// Branches pushed, in order.
    pub fn pushed(&self) -> Vec<String> {
        lock(&self.state).pushed.clone()
    }

    /// Directories passed to `recover`, in order.
    pub fn recovered_dirs(&self) -> Vec<PathBuf> {
        lock(&self.state).recovered.clone()
    }

    fn enter(&self, operation: GitOperation) -> Result<MutexGuard<'_, GitState>, GitError> {
        let mut state = lock(&self.state);
        state.calls.push(operation);
        if state.failing.contains(&operation) {
            return Err(GitError::CommandFailed {
                command: format!("{operation:?}"),
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl VersionControlClient for ScriptedGit {
    async fn ensure_clone(
        &self,
        _repository: &Repository,
        dir: &Path,
        _identity: &BotIdentity,
    ) -> Result<CloneStatus, GitError> {
        let mut state = self.enter(GitOperation::Clone)?;
        state.dirs.push(dir.to_path_buf());
        if state.cloned.insert(dir.to_path_buf()) {
            Ok(CloneStatus::Cloned)
        } else {
            Ok(CloneStatus::Reused)
        }
    }

    async fn fetch(&self, _dir: &Path) -> Result<(), GitError> {
        self.enter(GitOperation::Fetch).map(|_| ())
    }

    async fn checkout(&self, _dir: &Path, _branch: &str) -> Result<(), GitError> {
        self.enter(GitOperation::Checkout).map(|_| ())
    }

    async fn cherry_pick(&self, _dir: &Path, sha: &str) -> Result<CherryPickOutcome, GitError> {
        let state = self.enter(GitOperation::CherryPick)?;
        Ok(match state.conflicts.get(sha) {
            Some(files) => CherryPickOutcome::Conflicted {
                files: files.clone(),
            },
            None => CherryPickOutcome::Clean,
        })
    }

    async fn abort_cherry_pick(&self, _dir: &Path) -> Result<(), GitError> {
        self.enter(GitOperation::AbortCherryPick).map(|_| ())
    }

    async fn amend_author(&self, _dir: &Path, _identity: &BotIdentity) -> Result<(), GitError> {
        self.enter(GitOperation::AmendAuthor).map(|_| ())
    }

    async fn commit_all(
        &self,
        _dir: &Path,
        _identity: &BotIdentity,
        message: &str,
    ) -> Result<(), GitError> {
        let mut state = self.enter(GitOperation::CommitAll)?;
        state.commit_messages.push(message.to_string());
        Ok(())
    }

    async fn push(&self, _dir: &Path, branch: &str) -> Result<(), GitError> {
        let mut state = self.enter(GitOperation::Push)?;
        state.pushed.push(branch.to_string());
        Ok(())
    }

    async fn recover(&self, dir: &Path) -> Result<(), GitError> {
        let mut state = self.enter(GitOperation::Recover)?;
        state.recovered.push(dir.to_path_buf());
        Ok(())
    }
}
