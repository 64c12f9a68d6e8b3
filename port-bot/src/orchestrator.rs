//! Runs every port a merged pull request asks for.

use crate::planner::PortPlan;
use crate::port::{PortError, PortErrorKind, PortExecutor, PortKind, PortRequest, PortResult};
use crate::types::PullRequestRef;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{error, info};

/// Outcome of porting to one branch.
#[derive(Debug)]
pub struct BranchPortOutcome {
    /// Branch the port targeted.
    pub target_branch: String,

    /// Direction of the port.
    pub kind: PortKind,

    /// What happened.
    pub result: Result<PortResult, PortError>,
}

/// Invokes the [`PortExecutor`] once per planned target branch.
///
/// Each port runs under its own deadline. A failed port is logged and never
/// stops the others. Ports run one at a time unless the executor's workspace
/// gives each port its own working copy, in which case up to `concurrency`
/// run at once.
pub struct PortOrchestrator {
    executor: PortExecutor,
    port_timeout: Duration,
    concurrency: usize,
}

impl PortOrchestrator {
    /// Creates an orchestrator.
    pub fn new(executor: PortExecutor, port_timeout: Duration, concurrency: usize) -> Self {
        Self {
            executor,
            port_timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Number of ports that may run at once.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        if self.executor.workspace().allows_parallel() {
            self.concurrency
        } else {
            1
        }
    }

    /// Plans and runs all ports for a merged pull request.
    ///
    /// Outcomes are returned in plan order (backports first).
    pub async fn run_all(&self, pr: &PullRequestRef) -> Vec<BranchPortOutcome> {
        let plan = crate::planner::plan(pr);
        self.run_plan(pr, &plan).await
    }

    /// Runs the ports of an existing plan.
    pub async fn run_plan(&self, pr: &PullRequestRef, plan: &PortPlan) -> Vec<BranchPortOutcome> {
        let requests = plan.requests(pr);
        if requests.is_empty() {
            info!(pr = pr.number, "No ports requested");
            return Vec::new();
        }

        let concurrency = self.effective_concurrency();
        info!(
            pr = pr.number,
            ports = requests.len(),
            concurrency,
            "Running ports"
        );

        let mut outcomes: Vec<(usize, BranchPortOutcome)> =
            stream::iter(requests.into_iter().enumerate())
                .map(|(index, request)| async move { (index, self.run_one(request).await) })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        outcomes.sort_by_key(|(index, _)| *index);
        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }

    async fn run_one(&self, request: PortRequest) -> BranchPortOutcome {
        let deadline = tokio::time::timeout(self.port_timeout, self.executor.execute(&request));
        let result = match deadline.await {
            Ok(result) => result,
            Err(_) => {
                let kind = PortErrorKind::DeadlineExceeded {
                    timeout_secs: self.port_timeout.as_secs(),
                };
                error!(
                    pr = request.source.number,
                    target_branch = %request.target_branch,
                    error = %kind,
                    "Port timed out"
                );

                // The next port reuses a shared copy.
                if !self.executor.workspace().allows_parallel() {
                    self.executor.recover_working_copy(&request).await;
                }

                Err(PortError {
                    pr_number: request.source.number,
                    target_branch: request.target_branch.clone(),
                    kind,
                })
            }
        };

        BranchPortOutcome {
            target_branch: request.target_branch,
            kind: request.kind,
            result,
        }
    }
}
