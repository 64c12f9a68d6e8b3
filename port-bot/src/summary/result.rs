//! Event outcome types.

use crate::chores::ChoreReport;
use crate::orchestrator::BranchPortOutcome;

/// What handling one event produced.
#[derive(Debug)]
pub enum EventOutcome {
    /// The event needs no automation.
    Ignored {
        /// Why it was ignored.
        reason: String,
    },

    /// Review chores ran on an opened pull request.
    Chores(ChoreReport),

    /// Ports ran for a merged pull request.
    Ported {
        /// One outcome per target branch.
        outcomes: Vec<BranchPortOutcome>,
        /// Port labels naming invalid branches.
        rejected_labels: usize,
    },

    /// A dry run described the ports without running them.
    Previewed {
        /// Ports that would have run.
        ports: usize,
    },
}
