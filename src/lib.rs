//! chronicle - A CLI tool that generates changelogs from git tags and labeled GitHub issues.
//!
//! # Overview
//!
//! chronicle resolves a release range from local git tags, fetches the closed
//! issues of the repository's GitHub project, keeps the ones closed within the
//! range, and classifies them into change types (added, fixed, ...) by label.
//! The result is rendered as a Markdown changelog or as JSON.

pub mod config;
pub mod error;
pub mod format;
pub mod git;
pub mod github;
pub mod logging;
pub mod release;

// Re-export commonly used types
pub use error::{
    ConfigError, DescribeError, GitError, GitHubError, OutputError, RemoteUrlError,
    SummarizerError, VersionError,
};
pub use format::OutputFormat;
pub use git::{LocalGit, Tag, Vcs};
pub use github::{ChangeType, ChangeTypeTable, GitHubClient, GitHubSummarizer, Issue, Tracker};
pub use release::{
    BumpType, ChangeSummary, Description, DescriptionOptions, Reference, Release, Summarizer,
};
