use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use port_bot::fakes::{ForgeOperation, GitOperation, MemoryForge, ScriptedGit};
use port_bot::forge::RequestedReviewers;
use port_bot::{
    BotIdentity, GitCli, PortErrorKind, PortExecutor, PortKind, PortOrchestrator,
    PortRequest, PullRequestRef, Repository, Workspace,
};
use tempfile::TempDir;

fn merged_pr(labels: &[&str]) -> PullRequestRef {
    PullRequestRef {
        repository: Repository::new("vitessio", "vitess"),
        number: 100,
        merge_commit_sha: "abc123".to_string(),
        title: "Fix the planner".to_string(),
        author: "alice".to_string(),
        labels: labels.iter().map(ToString::to_string).collect(),
    }
}

fn orchestrator(forge: &Arc<MemoryForge>, git: &Arc<ScriptedGit>) -> PortOrchestrator {
    let executor = PortExecutor::new(
        forge.clone(),
        git.clone(),
        BotIdentity::default(),
        Workspace::shared("/work"),
    );
    PortOrchestrator::new(executor, Duration::from_secs(60), 1)
}

#[tokio::test]
async fn backports_to_every_labelled_branch() {
    let forge = Arc::new(
        MemoryForge::new()
            .with_branch("release-18", "tip18")
            .with_branch("release-19", "tip19"),
    );
    let git = Arc::new(ScriptedGit::new());
    let pr = merged_pr(&[
        "Backport to: release-18",
        "Backport to: release-19",
        "Needs doc",
    ]);

    let outcomes = orchestrator(&forge, &git).run_all(&pr).await;

    assert_eq!(outcomes.len(), 2);
    let created = forge.created_pull_requests();
    assert_eq!(created.len(), 2);

    for (outcome, (number, new_pr)) in outcomes.iter().zip(&created) {
        let result = outcome.result.as_ref().unwrap();
        let target = &outcome.target_branch;

        assert_eq!(result.new_pr_number, *number);
        assert_eq!(new_pr.base, *target);
        assert_eq!(new_pr.head, format!("backport-100-to-{target}"));
        assert_eq!(new_pr.title, format!("[{target}] Fix the planner (#100)"));
        assert!(!new_pr.draft);
        assert_eq!(forge.labels(*number), ["Needs doc", "Backport"]);
        assert_eq!(forge.review_requests(*number)[0].users, ["alice"]);
    }

    assert_eq!(
        git.pushed(),
        ["backport-100-to-release-18", "backport-100-to-release-19"]
    );
}

#[tokio::test]
async fn missing_branch_does_not_block_the_next_one() {
    let forge = Arc::new(MemoryForge::new().with_branch("release-18", "tip18"));
    let git = Arc::new(ScriptedGit::new());
    let pr = merged_pr(&["Backport to: release-99", "Backport to: release-18"]);

    let outcomes = orchestrator(&forge, &git).run_all(&pr).await;

    let error = outcomes[0].result.as_ref().unwrap_err();
    assert!(matches!(error.kind, PortErrorKind::RefNotFound { .. }));
    assert!(outcomes[1].result.is_ok());

    // Only the release-18 port reached the working copy.
    let clones = git
        .calls()
        .iter()
        .filter(|call| **call == GitOperation::Clone)
        .count();
    assert_eq!(clones, 1);
    assert_eq!(git.pushed(), ["backport-100-to-release-18"]);
}

#[tokio::test]
async fn conflicted_forwardport_is_flagged() {
    let forge = Arc::new(MemoryForge::new().with_branch("main", "tipmain"));
    let git = Arc::new(ScriptedGit::new().conflict_on("abc123", &["go/vt/planner.go"]));
    let pr = merged_pr(&["Forwardport to: main"]);

    let outcomes = orchestrator(&forge, &git).run_all(&pr).await;

    let result = outcomes[0].result.as_ref().unwrap();
    assert_eq!(outcomes[0].kind, PortKind::ForwardPort);
    assert!(result.had_conflict);
    assert_eq!(result.working_branch.as_str(), "forwardport-100-to-main");

    let (number, new_pr) = &forge.created_pull_requests()[0];
    assert!(new_pr.draft);
    assert_eq!(
        new_pr.body,
        "## Description\nThis is a forwardport of #100"
    );
    assert_eq!(
        forge.labels(*number),
        ["Forwardport", "Merge Conflict", "Skip CI"]
    );

    let comments = forge.comments(*number);
    assert_eq!(comments.len(), 1);
    assert!(comments[0].starts_with("Hello @alice"));
    assert!(comments[0].contains("git cherry-pick -m 1 abc123"));
    assert!(comments[0].contains(&format!("gh pr checkout {number} -R vitessio/vitess")));
    assert!(comments[0].contains("git reset --hard origin/main"));
}

#[tokio::test]
async fn requests_original_reviewers_on_every_port() {
    let forge = Arc::new(
        MemoryForge::new()
            .with_branch("release-18", "tip18")
            .with_requested_reviewers(
                100,
                RequestedReviewers {
                    users: vec!["bob".to_string(), "alice".to_string()],
                    teams: vec!["query-serving".to_string()],
                },
            ),
    );
    let git = Arc::new(ScriptedGit::new());

    let outcomes = orchestrator(&forge, &git)
        .run_all(&merged_pr(&["Backport to: release-18"]))
        .await;

    let number = outcomes[0].result.as_ref().unwrap().new_pr_number;
    let requests = forge.review_requests(number);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].users, ["bob", "alice"]);
    assert_eq!(requests[0].teams, ["query-serving"]);
}

#[tokio::test]
async fn comment_failure_is_a_follow_up_failure() {
    let forge = Arc::new(
        MemoryForge::new()
            .with_branch("release-18", "tip18")
            .fail_on(ForgeOperation::CreateComment),
    );
    let git = Arc::new(ScriptedGit::new().conflict_on("abc123", &["a.txt"]));

    let outcomes = orchestrator(&forge, &git)
        .run_all(&merged_pr(&["Backport to: release-18"]))
        .await;

    let result = outcomes[0].result.as_ref().unwrap();
    assert_eq!(result.follow_up_failures.len(), 1);
    assert!(matches!(
        result.follow_up_failures[0],
        PortErrorKind::CommentFailed { .. }
    ));
    // Labels and reviewers still went through.
    assert!(forge
        .labels(result.new_pr_number)
        .iter()
        .any(|label| label == "Merge Conflict"));
    assert_eq!(forge.review_requests(result.new_pr_number).len(), 1);
}

#[tokio::test]
async fn ref_lookup_failure_is_classified() {
    let forge = Arc::new(
        MemoryForge::new()
            .with_branch("release-18", "tip18")
            .fail_lookup_of("backport-100-to-release-18"),
    );
    let git = Arc::new(ScriptedGit::new());

    let outcomes = orchestrator(&forge, &git)
        .run_all(&merged_pr(&["Backport to: release-18"]))
        .await;

    let error = outcomes[0].result.as_ref().unwrap_err();
    assert!(matches!(error.kind, PortErrorKind::RefLookupFailed { .. }));
    assert!(git.calls().is_empty());
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str) -> String {
    fs::write(dir.join(name), content).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-m", message]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Origin with `release-18` branched off before `main` gained a fix.
///
/// The working branch already exists at the `release-18` tip, standing in
/// for the ref the forge would create.
fn origin_repo() -> (TempDir, String, String) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    git(dir, &["init"]);
    git(dir, &["config", "user.name", "maintainer"]);
    git(dir, &["config", "user.email", "maintainer@example.com"]);
    commit_file(dir, "planner.txt", "base\n", "base");
    git(dir, &["branch", "-M", "main"]);
    git(dir, &["branch", "release-18"]);
    let fix = commit_file(dir, "fix.txt", "fixed\n", "Fix the planner");
    git(dir, &["checkout", "release-18"]);
    let tip = commit_file(dir, "notes.txt", "18\n", "release notes");
    git(dir, &["branch", "backport-100-to-release-18"]);
    git(dir, &["checkout", "main"]);
    (temp, fix, tip)
}

#[tokio::test]
async fn ports_with_real_git() {
    let (origin, fix, tip) = origin_repo();
    let work = TempDir::new().unwrap();

    let forge = Arc::new(
        MemoryForge::new()
            .with_branch("release-18", &tip)
            .with_branch("backport-100-to-release-18", &tip),
    );
    let git_client = Arc::new(GitCli::new(origin.path().display().to_string()));
    let identity = BotIdentity::new("port-bot", "bot@example.com");
    let executor = PortExecutor::new(
        forge.clone(),
        git_client,
        identity,
        Workspace::shared(work.path()),
    );

    let mut pr = merged_pr(&["Backport to: release-18"]);
    pr.merge_commit_sha = fix.clone();
    let request = PortRequest {
        source: pr,
        target_branch: "release-18".to_string(),
        kind: PortKind::Backport,
        carry_labels: Vec::new(),
    };

    let result = executor.execute(&request).await.unwrap();

    assert!(!result.had_conflict);
    let origin_dir = origin.path();
    assert_eq!(
        git(
            origin_dir,
            &["log", "-1", "--format=%s|%an", "backport-100-to-release-18"]
        ),
        "Fix the planner|port-bot"
    );
    assert_eq!(
        git(
            origin_dir,
            &["rev-parse", "backport-100-to-release-18~1"]
        ),
        tip
    );
}
