//! Port kinds and requests.

use crate::types::PullRequestRef;
use serde::Serialize;
use std::fmt;

/// Direction of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    /// From a newer branch to an older maintenance branch.
    Backport,
    /// From an older branch to a newer one.
    ForwardPort,
}

impl PortKind {
    /// Lowercase slug used in working-branch names and PR bodies.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backport => "backport",
            Self::ForwardPort => "forwardport",
        }
    }

    /// Label added to every pull request of this kind.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Backport => "Backport",
            Self::ForwardPort => "Forwardport",
        }
    }
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One merged pull request to be ported to one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortRequest {
    /// The merged pull request.
    pub source: PullRequestRef,

    /// Branch the change is ported to.
    pub target_branch: String,

    /// Direction of the port.
    pub kind: PortKind,

    /// Labels of the source pull request carried onto the new one.
    pub carry_labels: Vec<String>,
}
