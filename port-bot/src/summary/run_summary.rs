//! Run summary types.

use super::result::EventOutcome;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of ports attempted.
    pub ports_attempted: usize,

    /// Number of port pull requests opened.
    pub prs_created: usize,

    /// Number of opened port pull requests whose cherry-pick conflicted.
    pub conflicted_ports: usize,

    /// Number of ports that failed before opening a pull request.
    pub ports_failed: usize,

    /// Number of best-effort steps that failed after a pull request was opened.
    pub follow_up_failures: usize,

    /// Number of port labels naming an invalid branch.
    pub rejected_labels: usize,

    /// Number of ports a dry run would have attempted.
    pub ports_planned: usize,

    /// Number of review chores that failed.
    pub chore_failures: usize,

    /// Whether the event was ignored.
    pub ignored: bool,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with the outcome of an event.
    pub fn record(&mut self, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Ignored { .. } => self.ignored = true,
            EventOutcome::Chores(report) => self.chore_failures += report.failures.len(),
            EventOutcome::Ported {
                outcomes,
                rejected_labels,
            } => {
                self.rejected_labels += rejected_labels;
                for outcome in outcomes {
                    self.ports_attempted += 1;
                    match &outcome.result {
                        Ok(result) => {
                            self.prs_created += 1;
                            if result.had_conflict {
                                self.conflicted_ports += 1;
                            }
                            self.follow_up_failures += result.follow_up_failures.len();
                        }
                        Err(_) => self.ports_failed += 1,
                    }
                }
            }
            EventOutcome::Previewed { ports } => self.ports_planned += ports,
        }
    }

    /// Returns true if any port failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.ports_failed > 0
    }

    /// Returns true if nothing went wrong at all, including best-effort
    /// follow-ups and review chores.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures() && self.follow_up_failures == 0 && self.chore_failures == 0
    }
}
