//! The issue tracker capability and its octocrab-backed implementation.

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::{debug, warn};

use crate::error::GitHubError;

use super::auth::get_github_token;
use super::issues::{Issue, fetch_closed_issues_with_client};
use super::releases::{ReleaseInfo, fetch_all_releases_with_client, fetch_release_with_client};
use super::retry::RetryPolicy;

/// Remote issue tracker capabilities the summarizer depends on.
///
/// This abstraction allows mocking GitHub in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Every closed issue and pull request of the repository.
    async fn fetch_all_closed_issues(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Issue>, GitHubError>;

    /// Every release of the repository, newest first.
    async fn fetch_all_releases(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<ReleaseInfo>, GitHubError>;

    /// The release published for `tag`.
    async fn fetch_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseInfo, GitHubError>;
}

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    retry: RetryPolicy,
}

impl GitHubClient {
    /// Build a client, authenticated when a token is given.
    pub fn new(token: Option<&str>) -> Result<Self, GitHubError> {
        let builder = Octocrab::builder();
        let builder = match token {
            Some(token) => builder.personal_token(token.to_string()),
            None => builder,
        };
        let octocrab = builder
            .build()
            .map_err(|e| GitHubError::Client(Box::new(e)))?;

        Ok(Self::with_client(octocrab))
    }

    /// Build a client from the ambient GitHub credentials.
    ///
    /// Falls back to unauthenticated access (with much lower rate limits) when
    /// no credentials are found.
    pub fn from_environment() -> Result<Self, GitHubError> {
        match get_github_token() {
            Ok(token) => {
                debug!("Using GitHub token from environment");
                Self::new(Some(&token))
            }
            Err(e) => {
                warn!("{}. Continuing with unauthenticated GitHub access.", e);
                Self::new(None)
            }
        }
    }

    /// Wrap a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(octocrab: Octocrab) -> Self {
        Self {
            octocrab,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Tracker for GitHubClient {
    async fn fetch_all_closed_issues(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Issue>, GitHubError> {
        fetch_closed_issues_with_client(&self.octocrab, owner, repo, &self.retry).await
    }

    async fn fetch_all_releases(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<ReleaseInfo>, GitHubError> {
        fetch_all_releases_with_client(&self.octocrab, owner, repo, &self.retry).await
    }

    async fn fetch_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<ReleaseInfo, GitHubError> {
        fetch_release_with_client(&self.octocrab, owner, repo, tag, &self.retry).await
    }
}
