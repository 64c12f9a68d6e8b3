//! [`ForgeClient`] backed by the GitHub REST API.

use super::{CreatedPullRequest, ForgeClient, ForgeError, NewPullRequest, RequestedReviewers};
use crate::rate_limit::{ensure_core_rate_limit, DEFAULT_MAX_WAIT};
use crate::types::{PullRequestRef, Repository};
use async_trait::async_trait;
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use octocrab::Octocrab;
use std::time::Duration;
use tracing::debug;

/// GitHub implementation of [`ForgeClient`].
///
/// Every call first checks the core rate limit and waits for a reset when it
/// is nearly exhausted, for at most `max_wait`.
#[derive(Debug, Clone)]
pub struct GitHubForge {
    octocrab: Octocrab,
    max_wait: Duration,
}

impl GitHubForge {
    /// Wraps an authenticated client.
    pub fn new(octocrab: Octocrab) -> Self {
        Self {
            octocrab,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Builds a client authenticated with a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn from_token(token: impl Into<String>) -> Result<Self, ForgeError> {
        let octocrab = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(octocrab))
    }

    /// Caps how long a call sleeps waiting for a rate limit reset.
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

#[async_trait]
impl ForgeClient for GitHubForge {
    async fn branch_head(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> Result<Option<String>, ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        debug!(repo = %repository, branch, "Looking up branch ref");

        let result = self
            .octocrab
            .repos(&repository.owner, &repository.name)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await;

        match result {
            Ok(reference) => Ok(Some(object_sha(reference.object, branch)?)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_branch(
        &self,
        repository: &Repository,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        debug!(repo = %repository, branch, sha, "Creating branch ref");

        self.octocrab
            .repos(&repository.owner, &repository.name)
            .create_ref(&Reference::Branch(branch.to_string()), sha)
            .await?;
        Ok(())
    }

    async fn pull_request(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<PullRequestRef, ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        let pr = self
            .octocrab
            .pulls(&repository.owner, &repository.name)
            .get(number)
            .await?;

        let what = format!("pull request {repository}#{number}");
        let merge_commit_sha = pr
            .merge_commit_sha
            .clone()
            .ok_or_else(|| ForgeError::MissingField {
                what: what.clone(),
                field: "merge_commit_sha",
            })?;
        let author = pr
            .user
            .as_ref()
            .map(|user| user.login.clone())
            .ok_or(ForgeError::MissingField {
                what,
                field: "user",
            })?;

        Ok(PullRequestRef {
            repository: repository.clone(),
            number: pr.number,
            merge_commit_sha,
            title: pr.title.clone().unwrap_or_default(),
            author,
            labels: pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|label| label.name)
                .collect(),
        })
    }

    async fn create_pull_request(
        &self,
        repository: &Repository,
        pull_request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        let pr = self
            .octocrab
            .pulls(&repository.owner, &repository.name)
            .create(
                pull_request.title.clone(),
                pull_request.head.clone(),
                pull_request.base.clone(),
            )
            .body(pull_request.body.clone())
            .draft(pull_request.draft)
            .maintainer_can_modify(true)
            .send()
            .await?;

        let url = pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| {
                format!(
                    "https://github.com/{}/pull/{}",
                    repository.full_name(),
                    pr.number
                )
            });

        Ok(CreatedPullRequest {
            number: pr.number,
            url,
        })
    }

    async fn requested_reviewers(
        &self,
        repository: &Repository,
        number: u64,
    ) -> Result<RequestedReviewers, ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        let pr = self
            .octocrab
            .pulls(&repository.owner, &repository.name)
            .get(number)
            .await?;

        Ok(RequestedReviewers {
            users: pr
                .requested_reviewers
                .unwrap_or_default()
                .into_iter()
                .map(|user| user.login)
                .collect(),
            teams: pr
                .requested_teams
                .unwrap_or_default()
                .into_iter()
                .map(|team| team.slug)
                .collect(),
        })
    }

    async fn request_reviewers(
        &self,
        repository: &Repository,
        number: u64,
        reviewers: &RequestedReviewers,
    ) -> Result<(), ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        self.octocrab
            .pulls(&repository.owner, &repository.name)
            .request_reviews(number, reviewers.users.clone(), reviewers.teams.clone())
            .await?;
        Ok(())
    }

    async fn add_labels(
        &self,
        repository: &Repository,
        number: u64,
        labels: &[String],
    ) -> Result<(), ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        self.octocrab
            .issues(&repository.owner, &repository.name)
            .add_labels(number, labels)
            .await?;
        Ok(())
    }

    async fn create_comment(
        &self,
        repository: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), ForgeError> {
        ensure_core_rate_limit(&self.octocrab, self.max_wait).await?;
        self.octocrab
            .issues(&repository.owner, &repository.name)
            .create_comment(number, body)
            .await?;
        Ok(())
    }
}

/// Extracts the SHA a ref points at.
fn object_sha(object: Object, branch: &str) -> Result<String, ForgeError> {
    match object {
        Object::Commit { sha, .. } | Object::Tag { sha, .. } => Ok(sha),
        #[allow(unreachable_patterns)]
        _ => Err(ForgeError::Rejected(format!(
            "ref for branch {branch} points at an unsupported object"
        ))),
    }
}

/// Checks if an error is a 404 from the API.
fn is_not_found(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => source.status_code.as_u16() == 404,
        _ => false,
    }
}

