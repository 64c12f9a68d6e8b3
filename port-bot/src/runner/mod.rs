//! Handles one `pull_request` event end to end.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::chores::run_review_chores;
use crate::event::{EventAction, PullRequestEvent};
use crate::forge::{ForgeClient, GitHubForge};
use crate::git::{GitCli, VersionControlClient};
use crate::orchestrator::PortOrchestrator;
use crate::planner::{plan, PortPlan};
use crate::port::{PortExecutor, WorkingBranch, Workspace};
use crate::rate_limit::DEFAULT_MAX_WAIT;
use crate::summary::{EventOutcome, RunSummary};
use crate::templates::generate_pr_title;
use crate::types::{PullRequestRef, Repository};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{info, info_span, warn, Instrument};

/// Dispatches an event to the review chores or the port workflow.
pub struct Runner {
    config: RunnerConfig,
    forge: Arc<dyn ForgeClient>,
    git: Arc<dyn VersionControlClient>,
}

impl Runner {
    /// Builds a runner talking to GitHub and the `git` binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be constructed.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let git_settings = &config.settings().git;
        let port_timeout = Duration::from_secs(git_settings.port_timeout_secs);
        let forge = GitHubForge::from_token(config.token())?
            .with_max_wait(rate_limit_wait_cap(port_timeout));
        let git = GitCli::new(git_settings.clone_url.clone()).with_token(config.token());
        Ok(Self::with_clients(config, Arc::new(forge), Arc::new(git)))
    }

    /// Builds a runner on top of existing clients.
    pub fn with_clients(
        config: RunnerConfig,
        forge: Arc<dyn ForgeClient>,
        git: Arc<dyn VersionControlClient>,
    ) -> Self {
        Self { config, forge, git }
    }

    /// Handles an event and summarises what happened.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that prevent handling the event at
    /// all. Failed ports and chores are counted in the summary instead.
    pub async fn run(&self, event: &PullRequestEvent) -> Result<RunSummary, RunnerError> {
        let repository = event.repository();
        let span = info_span!(
            "event",
            action = %event.action,
            repo = %repository,
            pr = event.number
        );

        async {
            let mut summary = RunSummary::new(self.config.dry_run());
            let outcome = self.handle(event, &repository).await?;
            summary.record(&outcome);
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    async fn handle(
        &self,
        event: &PullRequestEvent,
        repository: &Repository,
    ) -> Result<EventOutcome, RunnerError> {
        match event.action() {
            EventAction::Opened => {
                if self.config.dry_run() {
                    println!("\n[DRY RUN] {repository}#{}", event.number);
                    println!("  Would post the review checklist");
                    println!(
                        "  Would add labels: {:?}",
                        self.config.settings().pull_requests.initial_labels
                    );
                    return Ok(EventOutcome::Previewed { ports: 0 });
                }

                let report = run_review_chores(
                    self.forge.as_ref(),
                    repository,
                    event.number,
                    &self.config.settings().pull_requests,
                )
                .await;
                Ok(EventOutcome::Chores(report))
            }
            EventAction::Merged => self.port_merged(repository, event.number).await,
            EventAction::ClosedUnmerged => Ok(ignored("closed without merging")),
            EventAction::Synchronize => Ok(ignored("synchronize needs no automation")),
            EventAction::Other(action) => Ok(ignored(&format!("unhandled action {action}"))),
        }
    }

    async fn port_merged(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<EventOutcome, RunnerError> {
        let pr = self.forge.pull_request(repository, number).await?;
        let plan = plan(&pr);
        info!(
            backports = ?plan.backport_branches,
            forwardports = ?plan.forwardport_branches,
            "Planned ports"
        );

        if self.config.dry_run() {
            print_dry_run_preview(&pr, &plan);
            return Ok(EventOutcome::Previewed { ports: plan.len() });
        }

        if plan.is_empty() {
            return Ok(EventOutcome::Ported {
                outcomes: Vec::new(),
                rejected_labels: plan.rejected.len(),
            });
        }

        let git_settings = &self.config.settings().git;
        // Held until the ports finish; dropping it removes the directory.
        let mut temp_dir: Option<TempDir> = None;
        let root = match &git_settings.work_dir {
            Some(dir) => dir.clone(),
            None => {
                let dir = tempfile::tempdir().map_err(RunnerError::Workspace)?;
                let path = dir.path().to_path_buf();
                temp_dir = Some(dir);
                path
            }
        };
        let workspace = if git_settings.isolate_workspaces {
            Workspace::isolated(root)
        } else {
            Workspace::shared(root)
        };
        info!(root = %workspace.root().display(), layout = ?workspace.layout(), "Using workspace");

        let executor = PortExecutor::new(
            self.forge.clone(),
            self.git.clone(),
            self.config.settings().bot.clone(),
            workspace,
        );
        let orchestrator = PortOrchestrator::new(
            executor,
            Duration::from_secs(git_settings.port_timeout_secs),
            git_settings.concurrency,
        );

        let outcomes = orchestrator.run_plan(&pr, &plan).await;
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!(target_branch = %outcome.target_branch, error = %e, "Port failed");
            }
        }
        drop(temp_dir);

        Ok(EventOutcome::Ported {
            outcomes,
            rejected_labels: plan.rejected.len(),
        })
    }
}

fn ignored(reason: &str) -> EventOutcome {
    info!(reason, "Ignoring event");
    EventOutcome::Ignored {
        reason: reason.to_string(),
    }
}

fn print_dry_run_preview(pr: &PullRequestRef, plan: &PortPlan) {
    println!("\n[DRY RUN] {}#{}: {}", pr.repository, pr.number, pr.title);
    println!("  Merge commit: {}", pr.merge_commit_sha);

    let requests = plan.requests(pr);
    if requests.is_empty() {
        println!("  No ports requested");
    }

    for (i, request) in requests.iter().enumerate() {
        let working = WorkingBranch::new(request.kind, pr.number, &request.target_branch);
        println!(
            "  [{}/{}] {} to {}",
            i + 1,
            requests.len(),
            request.kind,
            request.target_branch
        );
        println!("    Working branch: {working}");
        println!(
            "    Would open: \"{}\"",
            generate_pr_title(&request.target_branch, &pr.title, pr.number)
        );
        println!(
            "    Labels: {:?}",
            crate::port::port_labels(request, false)
        );
    }

    for rejected in &plan.rejected {
        println!("  Ignoring label \"{}\": {}", rejected.label, rejected.reason);
    }

    println!();
}

/// Longest a forge call may sleep for a rate limit reset.
///
/// Half the port deadline, so a port that has to wait can still finish.
fn rate_limit_wait_cap(port_timeout: Duration) -> Duration {
    (port_timeout / 2).min(DEFAULT_MAX_WAIT)
}
