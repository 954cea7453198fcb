//! GitHub API operations using octocrab, and the summarizer built on them.

pub mod auth;
pub mod client;
pub mod filter;
pub mod issues;
pub mod labels;
pub mod releases;
pub mod retry;
pub mod summarizer;

pub use client::{GitHubClient, Tracker};
pub use issues::{Issue, IssueState};
pub use labels::{ChangeType, ChangeTypeTable};
pub use releases::{ReleaseInfo, latest_non_draft_release};
pub use retry::RetryPolicy;
pub use summarizer::GitHubSummarizer;
