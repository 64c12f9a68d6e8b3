//! The port workflow: one merged pull request, one target branch.
//!
//! [`PortExecutor::execute`] drives a [`ForgeClient`] and a
//! [`VersionControlClient`] through these stages:
//!
//! 1. Create the working branch ref at the target tip
//! 2. Make a working copy available
//! 3. Fetch and check out the working branch
//! 4. Cherry-pick the merge commit, committing conflicts as-is
//! 5. Push the working branch
//! 6. Open the pull request (draft when conflicted)
//! 7. Apply labels
//! 8. Comment with resolution steps when conflicted
//! 9. Request the original reviewers and author
//!
//! A failure up to step 6 aborts the port with a [`PortError`]. Failures of
//! steps 7 to 9 are collected in [`PortResult::follow_up_failures`].

mod branch;
mod error;
mod request;
mod result;
mod workspace;

pub use branch::WorkingBranch;
pub use error::{PortError, PortErrorKind, StepError};
pub use request::{PortKind, PortRequest};
pub use result::PortResult;
pub use workspace::{Workspace, WorkspaceLayout};

use crate::config::BotIdentity;
use crate::forge::{ForgeClient, NewPullRequest};
use crate::git::{CherryPickOutcome, CloneStatus, VersionControlClient};
use crate::templates::{
    generate_conflict_commit_message, generate_pr_title, ConflictNotice, TemplateRenderer,
};
use crate::types::Repository;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Label added to ports whose cherry-pick conflicted.
pub const MERGE_CONFLICT_LABEL: &str = "Merge Conflict";

/// Label added to conflicted ports so CI does not run on unresolved markers.
pub const SKIP_CI_LABEL: &str = "Skip CI";

/// Runs the port workflow for single requests.
#[derive(Clone)]
pub struct PortExecutor {
    forge: Arc<dyn ForgeClient>,
    git: Arc<dyn VersionControlClient>,
    identity: BotIdentity,
    renderer: Arc<TemplateRenderer>,
    workspace: Workspace,
}

impl PortExecutor {
    /// Creates an executor.
    pub fn new(
        forge: Arc<dyn ForgeClient>,
        git: Arc<dyn VersionControlClient>,
        identity: BotIdentity,
        workspace: Workspace,
    ) -> Self {
        Self {
            forge,
            git,
            identity,
            renderer: Arc::new(TemplateRenderer::new()),
            workspace,
        }
    }

    /// Workspace the executor places working copies in.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Ports `request.source` onto `request.target_branch`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when any stage up to opening the pull request
    /// fails. Side effects of completed stages are not rolled back.
    pub async fn execute(&self, request: &PortRequest) -> Result<PortResult, PortError> {
        let working = WorkingBranch::new(
            request.kind,
            request.source.number,
            &request.target_branch,
        );
        let span = info_span!(
            "port",
            pr = request.source.number,
            target_branch = %request.target_branch,
            working_branch = %working
        );

        async {
            info!(kind = %request.kind, "Starting port");
            match self.run(request, working).await {
                Ok(result) => {
                    info!(
                        new_pr = result.new_pr_number,
                        had_conflict = result.had_conflict,
                        follow_up_failures = result.follow_up_failures.len(),
                        "Port finished"
                    );
                    Ok(result)
                }
                Err(kind) => {
                    error!(error = %kind, stage = kind.name(), "Port failed");
                    Err(PortError {
                        pr_number: request.source.number,
                        target_branch: request.target_branch.clone(),
                        kind,
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Makes the working copy of `request` usable after an interrupted port.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn recover_working_copy(&self, request: &PortRequest) {
        let working = WorkingBranch::new(
            request.kind,
            request.source.number,
            &request.target_branch,
        );
        let dir = self.workspace.dir_for(&request.source.repository, &working);
        match self.git.recover(&dir).await {
            Ok(()) => info!(dir = %dir.display(), "Recovered working copy"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to recover working copy"),
        }
    }

    async fn run(
        &self,
        request: &PortRequest,
        working: WorkingBranch,
    ) -> Result<PortResult, PortErrorKind> {
        let source = &request.source;
        let repository = &source.repository;

        self.create_working_ref(repository, &request.target_branch, &working)
            .await?;

        let dir = self.workspace.dir_for(repository, &working);
        let status = self
            .git
            .ensure_clone(repository, &dir, &self.identity)
            .await
            .map_err(|source| PortErrorKind::CloneFailed { source })?;
        debug!(
            dir = %dir.display(),
            reused = status == CloneStatus::Reused,
            "Working copy ready"
        );

        self.git
            .fetch(&dir)
            .await
            .map_err(|source| PortErrorKind::FetchFailed { source })?;
        self.git
            .checkout(&dir, working.as_str())
            .await
            .map_err(|source| PortErrorKind::CheckoutFailed { source })?;

        let conflicted_files = self.cherry_pick(&dir, &source.merge_commit_sha).await?;
        let had_conflict = conflicted_files.is_some();

        self.git
            .push(&dir, working.as_str())
            .await
            .map_err(|source| PortErrorKind::PushFailed { source })?;

        let created = self
            .open_pull_request(request, &working, had_conflict)
            .await?;
        info!(new_pr = created.number, url = %created.url, "Opened pull request");

        let mut follow_up_failures = Vec::new();
        let mut record = |step: Result<(), PortErrorKind>| {
            if let Err(kind) = step {
                warn!(error = %kind, stage = kind.name(), "Follow-up step failed");
                follow_up_failures.push(kind);
            }
        };

        record(self.apply_labels(request, created.number, had_conflict).await);
        if had_conflict {
            record(self.comment_conflict(request, created.number).await);
        }
        record(self.request_reviewers(request, created.number).await);

        Ok(PortResult {
            new_pr_number: created.number,
            new_pr_url: created.url,
            working_branch: working,
            had_conflict,
            conflicted_files: conflicted_files.unwrap_or_default(),
            follow_up_failures,
        })
    }

    /// Creates the working branch at the target tip, or reuses it if it is
    /// still there.
    async fn create_working_ref(
        &self,
        repository: &Repository,
        target_branch: &str,
        working: &WorkingBranch,
    ) -> Result<(), PortErrorKind> {
        let tip = self
            .forge
            .branch_head(repository, target_branch)
            .await
            .map_err(|source| PortErrorKind::RefLookupFailed { source })?
            .ok_or_else(|| PortErrorKind::RefNotFound {
                branch: target_branch.to_string(),
            })?;

        let existing = self
            .forge
            .branch_head(repository, working.as_str())
            .await
            .map_err(|source| PortErrorKind::RefLookupFailed { source })?;

        match existing {
            None => {
                self.forge
                    .create_branch(repository, working.as_str(), &tip)
                    .await
                    .map_err(|source| PortErrorKind::RefCreateFailed { source })?;
                debug!(sha = %tip, "Created working branch");
                Ok(())
            }
            Some(sha) if sha == tip => {
                info!(sha = %tip, "Reusing working branch left at target tip");
                Ok(())
            }
            Some(sha) => Err(PortErrorKind::RefAlreadyExists {
                branch: working.to_string(),
                existing_sha: sha,
            }),
        }
    }

    /// Cherry-picks and commits. Returns the unmerged paths when conflicted.
    async fn cherry_pick(
        &self,
        dir: &Path,
        sha: &str,
    ) -> Result<Option<Vec<String>>, PortErrorKind> {
        let outcome = match self.git.cherry_pick(dir, sha).await {
            Ok(outcome) => outcome,
            Err(source) => {
                if let Err(e) = self.git.abort_cherry_pick(dir).await {
                    debug!(error = %e, "No cherry-pick to abort");
                }
                return Err(PortErrorKind::CherryPickFailed { source });
            }
        };

        match outcome {
            CherryPickOutcome::Clean => {
                self.git
                    .amend_author(dir, &self.identity)
                    .await
                    .map_err(|source| PortErrorKind::CommitFailed { source })?;
                Ok(None)
            }
            CherryPickOutcome::Conflicted { files } => {
                warn!(files = ?files, "Cherry-pick conflicted, committing as-is");
                self.git
                    .commit_all(dir, &self.identity, &generate_conflict_commit_message(sha))
                    .await
                    .map_err(|source| PortErrorKind::CommitFailed { source })?;
                Ok(Some(files))
            }
        }
    }

    async fn open_pull_request(
        &self,
        request: &PortRequest,
        working: &WorkingBranch,
        draft: bool,
    ) -> Result<crate::forge::CreatedPullRequest, PortErrorKind> {
        let source = &request.source;
        let body = self
            .renderer
            .render_pr_body(request.kind, source.number)
            .map_err(|e| PortErrorKind::PrCreateFailed {
                source: Box::new(e),
            })?;

        let pull_request = NewPullRequest {
            title: generate_pr_title(&request.target_branch, &source.title, source.number),
            head: working.to_string(),
            base: request.target_branch.clone(),
            body,
            draft,
        };

        self.forge
            .create_pull_request(&source.repository, &pull_request)
            .await
            .map_err(|e| PortErrorKind::PrCreateFailed {
                source: Box::new(e),
            })
    }

    async fn apply_labels(
        &self,
        request: &PortRequest,
        number: u64,
        had_conflict: bool,
    ) -> Result<(), PortErrorKind> {
        let labels = port_labels(request, had_conflict);
        self.forge
            .add_labels(&request.source.repository, number, &labels)
            .await
            .map_err(|source| PortErrorKind::LabelApplyFailed { source })
    }

    async fn comment_conflict(
        &self,
        request: &PortRequest,
        number: u64,
    ) -> Result<(), PortErrorKind> {
        let source = &request.source;
        let notice = ConflictNotice {
            repository: &source.repository,
            author: &source.author,
            kind: request.kind,
            pr_number: number,
            target_branch: &request.target_branch,
            sha: &source.merge_commit_sha,
        };
        let body = self
            .renderer
            .render_conflict_comment(&notice)
            .map_err(|e| PortErrorKind::CommentFailed {
                source: Box::new(e),
            })?;

        self.forge
            .create_comment(&source.repository, number, &body)
            .await
            .map_err(|e| PortErrorKind::CommentFailed {
                source: Box::new(e),
            })
    }

    async fn request_reviewers(
        &self,
        request: &PortRequest,
        number: u64,
    ) -> Result<(), PortErrorKind> {
        let source = &request.source;
        let mut reviewers = self
            .forge
            .requested_reviewers(&source.repository, source.number)
            .await
            .map_err(|source| PortErrorKind::ReviewerListFailed { source })?;

        if !reviewers.users.iter().any(|user| user == &source.author) {
            reviewers.users.push(source.author.clone());
        }

        self.forge
            .request_reviewers(&source.repository, number, &reviewers)
            .await
            .map_err(|source| PortErrorKind::ReviewerRequestFailed { source })
    }
}

/// Labels for a new port pull request: carried labels, the kind label, and
/// the conflict labels when conflicted.
#[must_use]
pub fn port_labels(request: &PortRequest, had_conflict: bool) -> Vec<String> {
    let mut labels = request.carry_labels.clone();
    let mut push = |label: &str| {
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    };

    push(request.kind.label());
    if had_conflict {
        push(MERGE_CONFLICT_LABEL);
        push(SKIP_CI_LABEL);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{ForgeOperation, GitOperation, MemoryForge, ScriptedGit};
    use crate::forge::RequestedReviewers;
    use crate::types::PullRequestRef;

    fn source() -> PullRequestRef {
        PullRequestRef {
            repository: Repository::new("vitessio", "vitess"),
            number: 100,
            merge_commit_sha: "abc123".to_string(),
            title: "Fix the planner".to_string(),
            author: "alice".to_string(),
            labels: vec!["Backport to: release-18".to_string(), "Needs doc".to_string()],
        }
    }

    fn request(target: &str) -> PortRequest {
        PortRequest {
            source: source(),
            target_branch: target.to_string(),
            kind: PortKind::Backport,
            carry_labels: vec!["Needs doc".to_string()],
        }
    }

    fn executor(forge: &Arc<MemoryForge>, git: &Arc<ScriptedGit>) -> PortExecutor {
        PortExecutor::new(
            forge.clone(),
            git.clone(),
            BotIdentity::default(),
            Workspace::shared("/work"),
        )
    }

    #[test]
    fn labels_for_conflicted_port() {
        assert_eq!(
            port_labels(&request("release-18"), false),
            ["Needs doc", "Backport"]
        );
        assert_eq!(
            port_labels(&request("release-18"), true),
            ["Needs doc", "Backport", "Merge Conflict", "Skip CI"]
        );
    }

    #[test]
    fn kind_label_is_not_duplicated() {
        let mut request = request("release-18");
        request.carry_labels = vec!["Backport".to_string()];
        assert_eq!(port_labels(&request, false), ["Backport"]);
    }

    #[tokio::test]
    async fn clean_port_opens_ready_pull_request() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new());

        let result = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap();

        assert!(result.is_clean());
        assert_eq!(result.working_branch.as_str(), "backport-100-to-release-18");
        assert_eq!(
            forge.branch("backport-100-to-release-18").as_deref(),
            Some("tip18")
        );

        let created = forge.created_pull_requests();
        assert_eq!(created.len(), 1);
        let (number, pr) = &created[0];
        assert_eq!(*number, result.new_pr_number);
        assert_eq!(pr.title, "[release-18] Fix the planner (#100)");
        assert_eq!(pr.body, "## Description\nThis is a backport of #100");
        assert_eq!(pr.head, "backport-100-to-release-18");
        assert_eq!(pr.base, "release-18");
        assert!(!pr.draft);
        assert!(forge.comments(result.new_pr_number).is_empty());

        assert!(git.calls().contains(&GitOperation::AmendAuthor));
        assert!(!git.calls().contains(&GitOperation::CommitAll));
    }

    #[tokio::test]
    async fn conflicted_port_is_draft_with_one_comment() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().conflict_on("abc123", &["go/vt/planner.go"]));

        let result = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap();

        assert!(result.had_conflict);
        assert_eq!(result.conflicted_files, ["go/vt/planner.go"]);
        assert!(forge.created_pull_requests()[0].1.draft);

        let labels = forge.labels(result.new_pr_number);
        assert!(labels.iter().any(|l| l == MERGE_CONFLICT_LABEL));
        assert!(labels.iter().any(|l| l == SKIP_CI_LABEL));

        let comments = forge.comments(result.new_pr_number);
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("abc123"));
        assert!(comments[0].contains(&format!("gh pr checkout {}", result.new_pr_number)));

        assert_eq!(
            git.commit_messages(),
            ["Cherry-pick abc123 with conflicts"]
        );
    }

    #[tokio::test]
    async fn missing_target_branch_touches_no_working_copy() {
        let forge = Arc::new(MemoryForge::new());
        let git = Arc::new(ScriptedGit::new());

        let error = executor(&forge, &git)
            .execute(&request("release-99"))
            .await
            .unwrap_err();

        assert!(matches!(error.kind, PortErrorKind::RefNotFound { .. }));
        assert_eq!(error.pr_number, 100);
        assert_eq!(error.target_branch, "release-99");
        assert!(git.calls().is_empty());
    }

    #[tokio::test]
    async fn reuses_working_branch_at_target_tip() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .with_branch("backport-100-to-release-18", "tip18"),
        );
        let git = Arc::new(ScriptedGit::new());

        let result = executor(&forge, &git).execute(&request("release-18")).await;

        assert!(result.is_ok());
        assert!(!forge.calls().contains(&ForgeOperation::CreateBranch));
    }

    #[tokio::test]
    async fn rejects_working_branch_that_moved() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .with_branch("backport-100-to-release-18", "pushed"),
        );
        let git = Arc::new(ScriptedGit::new());

        let error = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap_err();

        assert!(matches!(
            error.kind,
            PortErrorKind::RefAlreadyExists { ref existing_sha, .. } if existing_sha == "pushed"
        ));
        assert!(git.calls().is_empty());
        assert!(forge.created_pull_requests().is_empty());
    }

    #[tokio::test]
    async fn failed_cherry_pick_is_aborted() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::CherryPick));

        let error = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap_err();

        assert!(matches!(error.kind, PortErrorKind::CherryPickFailed { .. }));
        assert!(git.calls().contains(&GitOperation::AbortCherryPick));
        assert!(!git.calls().contains(&GitOperation::Push));
    }

    #[tokio::test]
    async fn push_failure_opens_no_pull_request() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::Push));

        let error = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap_err();

        assert!(matches!(error.kind, PortErrorKind::PushFailed { .. }));
        assert!(forge.created_pull_requests().is_empty());
    }

    #[tokio::test]
    async fn requests_reviewers_teams_and_author() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .with_requested_reviewers(
                    100,
                    RequestedReviewers {
                        users: vec!["bob".to_string()],
                        teams: vec!["maintainers".to_string()],
                    },
                ),
        );
        let git = Arc::new(ScriptedGit::new());

        let result = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap();

        let requests = forge.review_requests(result.new_pr_number);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].users, ["bob", "alice"]);
        assert_eq!(requests[0].teams, ["maintainers"]);
    }

    #[tokio::test]
    async fn follow_up_failures_do_not_fail_the_port() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .fail_on(ForgeOperation::AddLabels)
                .fail_on(ForgeOperation::RequestReviewers),
        );
        let git = Arc::new(ScriptedGit::new());

        let result = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap();

        let names: Vec<_> = result
            .follow_up_failures
            .iter()
            .map(PortErrorKind::name)
            .collect();
        assert_eq!(names, ["LabelApplyFailed", "ReviewerRequestFailed"]);
        assert_eq!(forge.created_pull_requests().len(), 1);
    }

    async fn failing_port(forge: &Arc<MemoryForge>, git: &Arc<ScriptedGit>) -> PortErrorKind {
        executor(forge, git)
            .execute(&request("release-18"))
            .await
            .unwrap_err()
            .kind
    }

    #[tokio::test]
    async fn ref_create_failure_stops_before_clone() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .fail_on(ForgeOperation::CreateBranch),
        );
        let git = Arc::new(ScriptedGit::new());

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::RefCreateFailed { .. }));
        assert!(git.calls().is_empty());
        assert!(forge.branch("backport-100-to-release-18").is_none());
    }

    #[tokio::test]
    async fn clone_failure_stops_before_fetch() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::Clone));

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::CloneFailed { .. }));
        assert_eq!(git.calls(), [GitOperation::Clone]);
    }

    #[tokio::test]
    async fn fetch_failure_stops_before_checkout() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::Fetch));

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::FetchFailed { .. }));
        assert_eq!(git.calls(), [GitOperation::Clone, GitOperation::Fetch]);
    }

    #[tokio::test]
    async fn checkout_failure_stops_before_cherry_pick() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::Checkout));

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::CheckoutFailed { .. }));
        assert_eq!(
            git.calls(),
            [GitOperation::Clone, GitOperation::Fetch, GitOperation::Checkout]
        );
    }

    #[tokio::test]
    async fn amend_failure_stops_before_push() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::AmendAuthor));

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::CommitFailed { .. }));
        assert_eq!(git.calls().last(), Some(&GitOperation::AmendAuthor));
        assert!(!git.calls().contains(&GitOperation::Push));
        assert!(forge.created_pull_requests().is_empty());
    }

    #[tokio::test]
    async fn conflict_commit_failure_stops_before_push() {
        let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
        let git = Arc::new(
            ScriptedGit::new()
                .conflict_on("abc123", &["go/vt/planner.go"])
                .fail_on(GitOperation::CommitAll),
        );

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::CommitFailed { .. }));
        assert_eq!(git.calls().last(), Some(&GitOperation::CommitAll));
        assert!(!git.calls().contains(&GitOperation::Push));
        assert!(forge.created_pull_requests().is_empty());
    }

    #[tokio::test]
    async fn pr_create_failure_skips_follow_ups() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .fail_on(ForgeOperation::CreatePullRequest),
        );
        let git = Arc::new(ScriptedGit::new().conflict_on("abc123", &["a.txt"]));

        let kind = failing_port(&forge, &git).await;

        assert!(matches!(kind, PortErrorKind::PrCreateFailed { .. }));
        assert_eq!(git.pushed(), ["backport-100-to-release-18"]);

        let calls = forge.calls();
        assert_eq!(calls.last(), Some(&ForgeOperation::CreatePullRequest));
        for later in [
            ForgeOperation::AddLabels,
            ForgeOperation::CreateComment,
            ForgeOperation::RequestedReviewers,
            ForgeOperation::RequestReviewers,
        ] {
            assert!(!calls.contains(&later), "{later:?} ran after a failed create");
        }
    }

    #[tokio::test]
    async fn reviewer_list_failure_requests_nobody() {
        let forge = Arc::new(
            MemoryForge::new()
                .with_branch("release-18", "tip18")
                .fail_on(ForgeOperation::RequestedReviewers),
        );
        let git = Arc::new(ScriptedGit::new());

        let result = executor(&forge, &git)
            .execute(&request("release-18"))
            .await
            .unwrap();

        assert_eq!(result.follow_up_failures.len(), 1);
        assert!(matches!(
            result.follow_up_failures[0],
            PortErrorKind::ReviewerListFailed { .. }
        ));
        assert!(!forge.calls().contains(&ForgeOperation::RequestReviewers));
        assert!(forge.review_requests(result.new_pr_number).is_empty());
    }

    #[tokio::test]
    async fn recovers_the_port_working_copy() {
        let forge = Arc::new(MemoryForge::new());
        let git = Arc::new(ScriptedGit::new());

        executor(&forge, &git)
            .recover_working_copy(&request("release-18"))
            .await;

        assert_eq!(
            git.recovered_dirs(),
            [std::path::PathBuf::from("/work/vitessio/vitess")]
        );
    }

    #[tokio::test]
    async fn recovery_failure_is_not_fatal() {
        let forge = Arc::new(MemoryForge::new());
        let git = Arc::new(ScriptedGit::new().fail_on(GitOperation::Recover));

        executor(&forge, &git)
            .recover_working_copy(&request("release-18"))
            .await;

        assert_eq!(git.calls(), [GitOperation::Recover]);
    }
}
