//! [`VersionControlClient`] backed by the `git` binary.

use super::{CherryPickOutcome, CloneStatus, GitError, VersionControlClient};
use crate::config::BotIdentity;
use crate::types::Repository;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Substring git prints when cloning into a populated directory.
const ALREADY_CLONED: &str = "already exists and is not an empty directory";

/// Lock git leaves behind when a process holding the index is killed.
const INDEX_LOCK: &str = ".git/index.lock";

/// Drives `git` through `tokio::process`.
///
/// Child processes are killed when their future is dropped, so a port that
/// hits its deadline leaves no git process running in the working copy.
#[derive(Debug, Clone)]
pub struct GitCli {
    clone_url: String,
    token: Option<String>,
    program: PathBuf,
}

impl GitCli {
    /// Creates a client cloning from `clone_url`.
    ///
    /// `{owner}` and `{repo}` in the URL are replaced per repository, and
    /// `{token}` by the access token when one is set.
    pub fn new(clone_url: impl Into<String>) -> Self {
        Self {
            clone_url: clone_url.into(),
            token: None,
            program: PathBuf::from("git"),
        }
    }

    /// Sets the token substituted into `{token}`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Runs `program` instead of the `git` found on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Resolves the clone URL for a repository.
    #[must_use]
    pub fn clone_url_for(&self, repository: &Repository) -> String {
        self.clone_url
            .replace("{owner}", &repository.owner)
            .replace("{repo}", &repository.name)
            .replace("{token}", self.token.as_deref().unwrap_or_default())
    }
}

#[async_trait]
impl VersionControlClient for GitCli {
    async fn ensure_clone(
        &self,
        repository: &Repository,
        dir: &Path,
        identity: &BotIdentity,
    ) -> Result<CloneStatus, GitError> {
        let status = if dir.join(".git").exists() {
            debug!(dir = %dir.display(), "Reusing existing working copy");
            CloneStatus::Reused
        } else {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| GitError::Io {
                    path: dir.display().to_string(),
                    source: e,
                })?;

            debug!(repo = %repository, dir = %dir.display(), "Cloning repository");
            let url = self.clone_url_for(repository);
            let output = self.spawn_git(dir, &["clone", &url, "."], "clone").await?;
            if output.status.success() {
                CloneStatus::Cloned
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.contains(ALREADY_CLONED) {
                    // Never echo the URL: it can carry the token.
                    return Err(GitError::CommandFailed {
                        command: "clone".to_string(),
                        stderr: stderr.replace(&url, "<clone-url>"),
                    });
                }
                CloneStatus::Reused
            }
        };

        self.run_git(dir, &["config", "user.name", &identity.name]).await?;
        self.run_git(dir, &["config", "user.email", &identity.email]).await?;

        Ok(status)
    }

    async fn fetch(&self, dir: &Path) -> Result<(), GitError> {
        self.run_git(dir, &["fetch", "origin"]).await
    }

    async fn checkout(&self, dir: &Path, branch: &str) -> Result<(), GitError> {
        let upstream = format!("origin/{branch}");
        self.run_git(dir, &["checkout", "--force", "-B", branch, &upstream])
            .await
    }

    async fn cherry_pick(&self, dir: &Path, sha: &str) -> Result<CherryPickOutcome, GitError> {
        let output = self
            .spawn_git(dir, &["cherry-pick", "-m", "1", sha], "cherry-pick")
            .await?;
        if output.status.success() {
            return Ok(CherryPickOutcome::Clean);
        }

        let files = self.unmerged_paths(dir).await?;
        if files.is_empty() {
            return Err(GitError::CommandFailed {
                command: format!("cherry-pick -m 1 {sha}"),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(files = ?files, "Cherry-pick left unmerged paths");
        Ok(CherryPickOutcome::Conflicted { files })
    }

    async fn abort_cherry_pick(&self, dir: &Path) -> Result<(), GitError> {
        self.run_git(dir, &["cherry-pick", "--abort"]).await
    }

    async fn amend_author(&self, dir: &Path, identity: &BotIdentity) -> Result<(), GitError> {
        let author = format!("--author={}", identity.author());
        self.run_git(dir, &["commit", "--amend", "--no-edit", &author]).await
    }

    async fn commit_all(
        &self,
        dir: &Path,
        identity: &BotIdentity,
        message: &str,
    ) -> Result<(), GitError> {
        self.run_git(dir, &["add", "."]).await?;
        let author = format!("--author={}", identity.author());
        self.run_git(dir, &["commit", &author, "-m", message]).await
    }

    async fn push(&self, dir: &Path, branch: &str) -> Result<(), GitError> {
        self.run_git(dir, &["push", "origin", branch]).await
    }

    async fn recover(&self, dir: &Path) -> Result<(), GitError> {
        if !dir.join(".git").exists() {
            return Ok(());
        }

        let lock = dir.join(INDEX_LOCK);
        if lock.exists() {
            debug!(path = %lock.display(), "Removing stale index lock");
            tokio::fs::remove_file(&lock)
                .await
                .map_err(|e| GitError::Io {
                    path: lock.display().to_string(),
                    source: e,
                })?;
        }

        if let Err(e) = self.run_git(dir, &["cherry-pick", "--abort"]).await {
            debug!(error = %e, "No cherry-pick to abort");
        }
        Ok(())
    }
}

impl GitCli {
    /// Lists paths git considers unmerged.
    async fn unmerged_paths(&self, dir: &Path) -> Result<Vec<String>, GitError> {
        let output = self
            .spawn_git(dir, &["diff", "--name-only", "--diff-filter=U"], "diff")
            .await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: "diff --name-only --diff-filter=U".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    /// Runs a git command, failing on a non-zero exit.
    async fn run_git(&self, dir: &Path, args: &[&str]) -> Result<(), GitError> {
        let output = self.spawn_git(dir, args, &args.join(" ")).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    /// Spawns git and collects its output regardless of exit status.
    async fn spawn_git(
        &self,
        dir: &Path,
        args: &[&str],
        label: &str,
    ) -> Result<Output, GitError> {
        debug!(dir = %dir.display(), command = %label, "Running git");

        Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| GitError::Spawn {
                command: label.to_string(),
                source: e,
            })
    }
}
