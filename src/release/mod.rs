//! Release summarization: the provider-independent contract and what it produces.

pub mod change;
pub mod description;
pub mod version;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SummarizerError;

pub use change::{ChangeSummary, Reference};
pub use description::{Description, DescriptionOptions, UNRELEASED, create_description};
pub use version::{BumpType, speculate_next_version, write_version_file};

/// A released version and when it was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub date: DateTime<Utc>,
}

/// Summarizes the changes of a repository between releases.
///
/// Implementations hold no mutable state, so a single instance can serve
/// concurrent callers as long as its collaborators can.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Look up the release published for `tag`.
    async fn release(&self, tag: &str) -> Result<Release, SummarizerError>;

    /// The most recent non-draft release.
    async fn last_release(&self) -> Result<Release, SummarizerError>;

    /// Browser URL of the tree at `tag`.
    fn tag_url(&self, tag: &str) -> String;

    /// Browser URL comparing `since_ref` with `until_ref`.
    fn changes_url(&self, since_ref: &str, until_ref: &str) -> String;

    /// Summaries of the categorized changes closed after `since_ref` and, when
    /// `until_ref` is non-empty, no later than `until_ref`.
    async fn changes(
        &self,
        since_ref: &str,
        until_ref: &str,
    ) -> Result<Vec<ChangeSummary>, SummarizerError>;
}
