//! Review chores for newly opened pull requests.

use crate::config::PullRequestSettings;
use crate::forge::{ForgeClient, ForgeError};
use crate::templates::DEFAULT_REVIEW_CHECKLIST;
use crate::types::Repository;
use tracing::{info, info_span, warn, Instrument};

/// Outcome of the review chores. Both steps are best-effort.
#[derive(Debug, Default)]
pub struct ChoreReport {
    /// Whether the review checklist comment was posted.
    pub checklist_posted: bool,

    /// Whether the initial labels were applied.
    pub labels_applied: bool,

    /// Steps that failed.
    pub failures: Vec<ForgeError>,
}

/// Posts the review checklist and applies the initial labels to a newly
/// opened pull request.
///
/// Failures are logged and reported, never propagated.
pub async fn run_review_chores(
    forge: &dyn ForgeClient,
    repository: &Repository,
    number: u64,
    settings: &PullRequestSettings,
) -> ChoreReport {
    let span = info_span!("review_chores", repo = %repository, pr = number);

    async {
        let mut report = ChoreReport::default();

        let checklist = settings
            .review_checklist_text
            .as_deref()
            .unwrap_or(DEFAULT_REVIEW_CHECKLIST);
        match forge.create_comment(repository, number, checklist).await {
            Ok(()) => {
                info!("Posted review checklist");
                report.checklist_posted = true;
            }
            Err(e) => {
                warn!(error = %e, "Failed to post review checklist");
                report.failures.push(e);
            }
        }

        if settings.initial_labels.is_empty() {
            return report;
        }

        match forge
            .add_labels(repository, number, &settings.initial_labels)
            .await
        {
            Ok(()) => {
                info!(labels = ?settings.initial_labels, "Applied initial labels");
                report.labels_applied = true;
            }
            Err(e) => {
                warn!(error = %e, "Failed to apply initial labels");
                report.failures.push(e);
            }
        }

        report
    }
    .instrument(span)
    .await
}
