//! Release summarizer backed by GitHub issues and local git tags.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{GitError, GitHubError, SummarizerError};
use crate::git::{RepoCoordinates, Tag, Vcs, parse_remote_url};
use crate::release::{ChangeSummary, Reference, Release, Summarizer};

use super::client::Tracker;
use super::filter::{
    IssueFilter, filter_issues, issues_after, issues_before, issues_closed, issues_with_label,
    issues_without_label,
};
use super::issues::Issue;
use super::labels::ChangeTypeTable;
use super::releases::{ReleaseInfo, latest_non_draft_release};

/// Summarizes changes from the closed, labeled issues of a GitHub repository.
pub struct GitHubSummarizer<T, V> {
    repo_path: PathBuf,
    coordinates: RepoCoordinates,
    tracker: T,
    vcs: V,
    change_types: ChangeTypeTable,
    exclude_labels: Vec<String>,
}

impl<T: Tracker, V: Vcs> GitHubSummarizer<T, V> {
    /// Bind a summarizer to the repository at `repo_path`.
    ///
    /// The GitHub coordinates are taken from the repository's `origin` remote.
    pub fn new(
        repo_path: impl Into<PathBuf>,
        tracker: T,
        vcs: V,
        change_types: ChangeTypeTable,
    ) -> Result<Self, SummarizerError> {
        let repo_path = repo_path.into();
        let url = vcs
            .remote_url(&repo_path)
            .map_err(|source| SummarizerError::Vcs {
                operation: "read the remote URL",
                source,
            })?;
        let coordinates = parse_remote_url(&url)?;

        debug!(
            host = %coordinates.host,
            repository = %coordinates.slug(),
            "Summarizing changes"
        );

        Ok(Self {
            repo_path,
            coordinates,
            tracker,
            vcs,
            change_types,
            exclude_labels: Vec::new(),
        })
    }

    /// Skip issues carrying any of these labels, whatever else they are labeled with.
    pub fn with_exclude_labels(mut self, labels: Vec<String>) -> Self {
        self.exclude_labels = labels;
        self
    }

    pub fn coordinates(&self) -> &RepoCoordinates {
        &self.coordinates
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn resolve_tag(&self, tag_ref: &str) -> Result<Tag, SummarizerError> {
        self.vcs
            .search_for_tag(&self.repo_path, tag_ref)
            .map_err(|e| match e {
                GitError::TagNotFound(name) => SummarizerError::TagNotFound(name),
                source => SummarizerError::Vcs {
                    operation: "resolve tag",
                    source,
                },
            })
    }

    fn tracker_error(&self, operation: &'static str, source: GitHubError) -> SummarizerError {
        SummarizerError::Tracker {
            operation,
            repository: self.coordinates.slug(),
            source,
        }
    }

    /// Project an issue into a summary, or `None` when no label classifies it.
    fn summarize(&self, issue: Issue) -> Option<ChangeSummary> {
        let change_types = self.change_types.change_types(&issue.labels);
        if change_types.is_empty() {
            return None;
        }

        Some(ChangeSummary {
            text: issue.title,
            change_types,
            timestamp: issue.closed_at?,
            references: vec![Reference {
                text: format!("#{}", issue.number),
                url: issue.url,
            }],
        })
    }
}

fn to_release(info: &ReleaseInfo) -> Release {
    Release {
        version: info.tag.clone(),
        date: info.date,
    }
}

#[async_trait]
impl<T: Tracker, V: Vcs> Summarizer for GitHubSummarizer<T, V> {
    async fn release(&self, tag: &str) -> Result<Release, SummarizerError> {
        let info = self
            .tracker
            .fetch_release(&self.coordinates.owner, &self.coordinates.name, tag)
            .await
            .map_err(|e| match e {
                GitHubError::ReleaseNotFound { tag } => SummarizerError::ReleaseNotFound(tag),
                source => self.tracker_error("fetch release", source),
            })?;

        Ok(to_release(&info))
    }

    async fn last_release(&self) -> Result<Release, SummarizerError> {
        let releases = self
            .tracker
            .fetch_all_releases(&self.coordinates.owner, &self.coordinates.name)
            .await
            .map_err(|source| self.tracker_error("fetch all releases", source))?;

        let latest =
            latest_non_draft_release(&releases).ok_or_else(|| SummarizerError::NoRelease {
                repository: self.coordinates.slug(),
            })?;

        info!(version = %latest.tag, "Found latest release");

        Ok(to_release(latest))
    }

    fn tag_url(&self, tag: &str) -> String {
        format!("{}/tree/{}", self.coordinates.web_url(), tag)
    }

    fn changes_url(&self, since_ref: &str, until_ref: &str) -> String {
        format!(
            "{}/compare/{}...{}",
            self.coordinates.web_url(),
            since_ref,
            until_ref
        )
    }

    async fn changes(
        &self,
        since_ref: &str,
        until_ref: &str,
    ) -> Result<Vec<ChangeSummary>, SummarizerError> {
        let all_closed_issues = self
            .tracker
            .fetch_all_closed_issues(&self.coordinates.owner, &self.coordinates.name)
            .await
            .map_err(|source| self.tracker_error("fetch closed issues", source))?;

        let since_tag = self.resolve_tag(since_ref)?;

        let mut filters: Vec<IssueFilter> = vec![
            issues_closed(),
            issues_after(since_tag.timestamp),
            issues_with_label(self.change_types.labels()),
        ];

        if !self.exclude_labels.is_empty() {
            filters.push(issues_without_label(self.exclude_labels.iter().cloned()));
        }

        if !until_ref.is_empty() {
            let until_tag = self.resolve_tag(until_ref)?;
            filters.push(issues_before(until_tag.timestamp));
        }

        let total = all_closed_issues.len();
        let filtered = filter_issues(all_closed_issues, &filters);

        let mut summaries: Vec<ChangeSummary> = filtered
            .into_iter()
            .filter_map(|issue| self.summarize(issue))
            .collect();

        // Chronological, ties keep tracker order
        summaries.sort_by_key(|summary| summary.timestamp);

        let until_display = if until_ref.is_empty() { "(unbounded)" } else { until_ref };
        info!(
            since = %since_ref,
            until = %until_display,
            closed = total,
            summarized = summaries.len(),
            "Summarized changes"
        );

        Ok(summaries)
    }
}
