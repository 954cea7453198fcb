//! Error types for chronicle modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from local git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No '{0}' remote configured")]
    NoRemote(String),

    #[error("Remote '{0}' has no valid URL")]
    RemoteHasNoUrl(String),

    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Failed to look up tag '{0}': {1}")]
    TagLookup(String, #[source] git2::Error),

    #[error("Failed to resolve tag '{0}' to a commit: {1}")]
    PeelTag(String, #[source] git2::Error),

    #[error("Tag {tag} points at a commit with an invalid timestamp (seconds={seconds})")]
    InvalidTimestamp { tag: String, seconds: i64 },
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    Client(#[source] Box<octocrab::Error>),

    #[error("Failed to fetch {operation}: {source}")]
    Api {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Release not found for tag '{tag}'")]
    ReleaseNotFound { tag: String },

    #[error("Release '{tag}' has neither a publish nor a creation date")]
    MissingReleaseDate { tag: String },

    #[error("All {attempts} attempts failed: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<GitHubError>,
    },
}

impl GitHubError {
    /// Whether another attempt at the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Errors from extracting repository coordinates out of a remote URL.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RemoteUrlError {
    #[error("Unrecognized remote URL '{0}' (expected git@<host>:<owner>/<repo>.git or https://<host>/<owner>/<repo>)")]
    Unrecognized(String),

    #[error("Remote URL '{url}' has an empty owner or repository name")]
    EmptyCoordinate { url: String },
}

/// Errors surfaced by a release summarizer.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("Invalid repository configuration: {0}")]
    Configuration(#[from] RemoteUrlError),

    #[error("Tag '{0}' not found in the local repository")]
    TagNotFound(String),

    #[error("No release found for '{0}'")]
    ReleaseNotFound(String),

    #[error("Unable to find a published (non-draft) release for {repository}")]
    NoRelease { repository: String },

    #[error("Failed to {operation} for {repository}: {source}")]
    Tracker {
        operation: &'static str,
        repository: String,
        #[source]
        source: GitHubError,
    },

    #[error("Failed to {operation}: {source}")]
    Vcs {
        operation: &'static str,
        #[source]
        source: GitError,
    },
}

impl SummarizerError {
    /// Whether this error means a tag or release could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TagNotFound(_) | Self::ReleaseNotFound(_) | Self::NoRelease { .. }
        )
    }
}

/// Errors from loading and validating the application config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read application config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse application config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Bad log level configured ({0:?})")]
    InvalidLogLevel(String),

    #[error("Cannot specify both --speculate-next-version and --until-tag")]
    ConflictingOptions,

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unable to open log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Errors from version speculation.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),

    #[error("Failed to write version file {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from building a release description.
#[derive(Error, Debug)]
pub enum DescribeError {
    #[error(transparent)]
    Summarizer(#[from] SummarizerError),

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Errors from rendering output.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize changelog: {0}")]
    Serialize(#[source] serde_json::Error),
}
