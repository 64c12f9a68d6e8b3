//! Where working copies live.

use super::WorkingBranch;
use crate::types::Repository;
use std::path::{Path, PathBuf};

/// How working copies are laid out under the workspace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceLayout {
    /// One working copy per repository, reused by every port.
    Shared,
    /// One working copy per port.
    Isolated,
}

/// Root directory for working copies and their layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    layout: WorkspaceLayout,
}

impl Workspace {
    /// One working copy per repository under `root`.
    pub fn shared(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: WorkspaceLayout::Shared,
        }
    }

    /// One working copy per port under `root`.
    pub fn isolated(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: WorkspaceLayout::Isolated,
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Layout of working copies.
    pub fn layout(&self) -> WorkspaceLayout {
        self.layout
    }

    /// Whether ports may run at the same time without sharing a working copy.
    #[must_use]
    pub fn allows_parallel(&self) -> bool {
        self.layout == WorkspaceLayout::Isolated
    }

    /// Directory of the working copy a port uses.
    #[must_use]
    pub fn dir_for(&self, repository: &Repository, working_branch: &WorkingBranch) -> PathBuf {
        let repo_dir = self.root.join(&repository.owner).join(&repository.name);
        match self.layout {
            WorkspaceLayout::Shared => repo_dir,
            WorkspaceLayout::Isolated => {
                repo_dir.join(working_branch.as_str().replace('/', "_"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    #[test]
    fn shared_workspace_uses_one_copy_per_repository() {
        let workspace = Workspace::shared("/work");
        let repo = Repository::new("vitessio", "vitess");
        let a = WorkingBranch::new(PortKind::Backport, 1, "release-18");
        let b = WorkingBranch::new(PortKind::Backport, 1, "release-19");

        assert_eq!(workspace.dir_for(&repo, &a), workspace.dir_for(&repo, &b));
        assert_eq!(
            workspace.dir_for(&repo, &a),
            PathBuf::from("/work/vitessio/vitess")
        );
        assert!(!workspace.allows_parallel());
    }

    #[test]
    fn isolated_workspace_uses_one_copy_per_port() {
        let workspace = Workspace::isolated("/work");
        let repo = Repository::new("vitessio", "vitess");
        let a = WorkingBranch::new(PortKind::Backport, 1, "release/18.0");
        let b = WorkingBranch::new(PortKind::Backport, 1, "release/19.0");

        assert_ne!(workspace.dir_for(&repo, &a), workspace.dir_for(&repo, &b));
        assert_eq!(
            workspace.dir_for(&repo, &a),
            PathBuf::from("/work/vitessio/vitess/backport-1-to-release_18.0")
        );
        assert!(workspace.allows_parallel());
    }
}
