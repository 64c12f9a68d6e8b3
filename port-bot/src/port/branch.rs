//! Working-branch naming.

use super::PortKind;
use serde::Serialize;
use std::fmt;

/// Branch holding a ported commit before its pull request is opened.
///
/// Named `{kind}-{number}-to-{target}`, so a (pull request, target branch)
/// pair always maps to the same branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkingBranch(String);

impl WorkingBranch {
    /// Derives the working branch for a port.
    #[must_use]
    pub fn new(kind: PortKind, pr_number: u64, target_branch: &str) -> Self {
        Self(format!("{}-{pr_number}-to-{target_branch}", kind.as_str()))
    }

    /// Branch name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkingBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_backport_branch() {
        let branch = WorkingBranch::new(PortKind::Backport, 100, "release-18");
        assert_eq!(branch.as_str(), "backport-100-to-release-18");
    }

    #[test]
    fn names_forwardport_branch() {
        let branch = WorkingBranch::new(PortKind::ForwardPort, 7, "main");
        assert_eq!(branch.to_string(), "forwardport-7-to-main");
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(
            WorkingBranch::new(PortKind::Backport, 42, "release/19.0"),
            WorkingBranch::new(PortKind::Backport, 42, "release/19.0")
        );
        assert_ne!(
            WorkingBranch::new(PortKind::Backport, 42, "release-19"),
            WorkingBranch::new(PortKind::ForwardPort, 42, "release-19")
        );
    }
}
