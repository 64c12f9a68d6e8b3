//! Derives port targets from a merged pull request's labels.

use crate::port::{PortKind, PortRequest};
use crate::types::PullRequestRef;
use bstr::ByteSlice;
use serde::Serialize;
use tracing::warn;

/// Label prefix requesting a backport to the branch named by the rest of the label.
pub const BACKPORT_LABEL_PREFIX: &str = "Backport to: ";

/// Label prefix requesting a forward-port to the branch named by the rest of the label.
pub const FORWARDPORT_LABEL_PREFIX: &str = "Forwardport to: ";

/// A port label whose branch name cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLabel {
    /// The label as it appears on the pull request.
    pub label: String,

    /// Why it was not planned.
    pub reason: String,
}

/// Branches a merged pull request must be ported to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortPlan {
    /// Targets of `Backport to: ` labels, in label order.
    pub backport_branches: Vec<String>,

    /// Targets of `Forwardport to: ` labels, in label order.
    pub forwardport_branches: Vec<String>,

    /// All other labels, carried onto every new pull request.
    pub other_labels: Vec<String>,

    /// Port labels naming an invalid branch.
    pub rejected: Vec<RejectedLabel>,
}

impl PortPlan {
    /// Returns true when there is nothing to port.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backport_branches.is_empty() && self.forwardport_branches.is_empty()
    }

    /// Number of ports planned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backport_branches.len() + self.forwardport_branches.len()
    }

    /// Expands the plan into one request per target branch, backports first.
    #[must_use]
    pub fn requests(&self, source: &PullRequestRef) -> Vec<PortRequest> {
        let backports = self
            .backport_branches
            .iter()
            .map(|branch| (PortKind::Backport, branch));
        let forwardports = self
            .forwardport_branches
            .iter()
            .map(|branch| (PortKind::ForwardPort, branch));

        backports
            .chain(forwardports)
            .map(|(kind, branch)| PortRequest {
                source: source.clone(),
                target_branch: branch.clone(),
                kind,
                carry_labels: self.other_labels.clone(),
            })
            .collect()
    }
}

/// Partitions a pull request's labels into backport targets, forward-port
/// targets and labels to carry over.
///
/// Prefix matching is exact and case-sensitive. A port label whose suffix is
/// not a valid branch name is neither planned nor carried over; it is
/// recorded in [`PortPlan::rejected`]. Repeated targets of the same kind are
/// planned once.
#[must_use]
pub fn plan(pr: &PullRequestRef) -> PortPlan {
    let mut plan = PortPlan::default();

    for label in &pr.labels {
        let (branch, targets) = if let Some(branch) = label.strip_prefix(BACKPORT_LABEL_PREFIX) {
            (branch, &mut plan.backport_branches)
        } else if let Some(branch) = label.strip_prefix(FORWARDPORT_LABEL_PREFIX) {
            (branch, &mut plan.forwardport_branches)
        } else {
            plan.other_labels.push(label.clone());
            continue;
        };

        match validate_branch_name(branch) {
            Ok(()) => {
                if !targets.iter().any(|existing| existing == branch) {
                    targets.push(branch.to_string());
                }
            }
            Err(reason) => {
                warn!(pr = pr.number, label = %label, reason = %reason, "Ignoring port label");
                plan.rejected.push(RejectedLabel {
                    label: label.clone(),
                    reason,
                });
            }
        }
    }

    plan
}

/// Checks that a label suffix is usable as a git branch name.
fn validate_branch_name(branch: &str) -> Result<(), String> {
    if branch.trim().is_empty() {
        return Err("branch name is empty".to_string());
    }

    gix_validate::reference::name_partial(branch.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| e.to_string())
}
