//! Remote URL lookup and repository coordinate extraction.

use std::sync::LazyLock;

use git2::Repository;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GitError, RemoteUrlError};

const ORIGIN: &str = "origin";

static SSH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^git@([^:/]+):(.+)$").expect("Invalid SSH remote regex"));

static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:[^@/]+@)?([^/]+)/(.+)$").expect("Invalid HTTPS remote regex")
});

/// Where a repository lives on its hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinates {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    /// Browser URL of the repository, e.g. `https://github.com/acme/widgets`.
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }

    /// `owner/name`, as used in log messages and errors.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Remote URL shapes that coordinates can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteUrlStyle {
    /// `git@github.com:owner/repo.git`
    Ssh,
    /// `https://github.com/owner/repo.git`, optionally with credentials before the host.
    Https,
}

impl RemoteUrlStyle {
    /// Styles in the order they are tried by [`parse_remote_url`].
    pub const ALL: [RemoteUrlStyle; 2] = [RemoteUrlStyle::Ssh, RemoteUrlStyle::Https];

    fn regex(self) -> &'static Regex {
        match self {
            Self::Ssh => &*SSH_URL,
            Self::Https => &*HTTPS_URL,
        }
    }

    /// Split a URL of this style into its host and `owner/repo` path.
    ///
    /// Returns `None` when the URL is not of this style.
    pub fn split(self, url: &str) -> Option<(String, String)> {
        let caps = self.regex().captures(url.trim())?;
        Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
    }

    /// Extract coordinates from a URL of this style.
    ///
    /// Returns `None` when the URL is not of this style at all.
    pub fn parse(self, url: &str) -> Option<Result<RepoCoordinates, RemoteUrlError>> {
        let (host, path) = self.split(url)?;
        Some(parse_owner_repo_path(url, host, &path))
    }
}

/// Extract `{host, owner, name}` from a git remote URL.
pub fn parse_remote_url(url: &str) -> Result<RepoCoordinates, RemoteUrlError> {
    RemoteUrlStyle::ALL
        .iter()
        .find_map(|style| style.parse(url))
        .unwrap_or_else(|| Err(RemoteUrlError::Unrecognized(url.to_string())))
}

fn parse_owner_repo_path(
    url: &str,
    host: String,
    path: &str,
) -> Result<RepoCoordinates, RemoteUrlError> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, name] if owner.is_empty() || name.is_empty() => {
            Err(RemoteUrlError::EmptyCoordinate {
                url: url.to_string(),
            })
        }
        [owner, name] => Ok(RepoCoordinates {
            host,
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(RemoteUrlError::Unrecognized(url.to_string())),
    }
}

/// Get the URL of the `origin` remote.
pub fn remote_url(repo: &Repository) -> Result<String, GitError> {
    let remote = repo
        .find_remote(ORIGIN)
        .map_err(|_| GitError::NoRemote(ORIGIN.to_string()))?;

    remote
        .url()
        .map(str::to_string)
        .ok_or_else(|| GitError::RemoteHasNoUrl(ORIGIN.to_string()))
}
