//! Closed issue fetching via octocrab.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitHubError;

use super::retry::{RetryPolicy, retry_with_backoff};

/// Maximum number of pages to follow before giving up on a listing.
pub(crate) const MAX_PAGES: u32 = 100;

/// Items requested per page.
pub(crate) const PER_PAGE: u8 = 100;

/// Whether an issue is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// A GitHub issue or pull request, reduced to what summarization needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<String>,
    pub closed_at: Option<DateTime<Utc>>,
    pub state: IssueState,
}

impl From<octocrab::models::issues::Issue> for Issue {
    fn from(issue: octocrab::models::issues::Issue) -> Self {
        let state = match issue.state {
            octocrab::models::IssueState::Closed => IssueState::Closed,
            _ => IssueState::Open,
        };

        Self {
            number: issue.number,
            title: issue.title,
            url: issue.html_url.to_string(),
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            closed_at: issue.closed_at,
            state,
        }
    }
}

/// Fetch every closed issue and pull request of a repository.
///
/// Pages are followed until GitHub reports no further page. Items that are not
/// closed are dropped.
pub async fn fetch_closed_issues_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    retry: &RetryPolicy,
) -> Result<Vec<Issue>, GitHubError> {
    let mut all_issues = Vec::new();
    let mut page = 1u32;

    loop {
        let issues_page = retry_with_backoff(retry, || async move {
            octocrab
                .issues(owner, repo)
                .list()
                .state(octocrab::params::State::Closed)
                .per_page(PER_PAGE)
                .page(page)
                .send()
                .await
                .map_err(|e| classify_error(e, "closed issues", owner, repo))
        })
        .await?;

        let has_next = issues_page.next.is_some();
        if issues_page.items.is_empty() {
            break;
        }

        all_issues.extend(
            issues_page
                .items
                .into_iter()
                .map(Issue::from)
                .filter(|issue| issue.state == IssueState::Closed),
        );

        if !has_next {
            break;
        }

        page += 1;

        // Safety limit to prevent infinite loops
        if page > MAX_PAGES {
            warn!(
                "Reached {}-page safety limit while fetching issues for {}/{}",
                MAX_PAGES, owner, repo
            );
            break;
        }
    }

    debug!(count = all_issues.len(), "Fetched closed issues for {}/{}", owner, repo);

    Ok(all_issues)
}

/// Map an octocrab error onto the error kinds callers react to.
pub(crate) fn classify_error(
    e: octocrab::Error,
    operation: &'static str,
    owner: &str,
    repo: &str,
) -> GitHubError {
    // Check error content using both Display and Debug output
    // to handle different octocrab error formats
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }

    if is_not_found(&err_display, &err_debug) {
        return GitHubError::RepositoryNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
    }

    GitHubError::Api {
        operation,
        source: Box::new(e),
    }
}

pub(crate) fn is_not_found(err_display: &str, err_debug: &str) -> bool {
    err_display.contains("Not Found") || err_debug.contains("Not Found")
}
