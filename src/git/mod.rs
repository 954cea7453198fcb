//! Git operations using git2-rs.

pub mod remote;
pub mod tags;

use std::path::Path;

use git2::Repository;

use crate::error::GitError;

pub use remote::{RemoteUrlStyle, RepoCoordinates, parse_remote_url, remote_url};
pub use tags::{Tag, search_for_tag};

/// Local version-control capabilities the summarizer depends on.
///
/// This abstraction allows faking the repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs: Send + Sync {
    /// URL of the repository's `origin` remote.
    fn remote_url(&self, repo_path: &Path) -> Result<String, GitError>;

    /// Resolve a tag name to the tag and its commit timestamp.
    fn search_for_tag(&self, repo_path: &Path, tag_ref: &str) -> Result<Tag, GitError>;
}

/// Default implementation backed by a repository on disk.
///
/// The repository is reopened for every call since `git2::Repository` is not `Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalGit;

impl Vcs for LocalGit {
    fn remote_url(&self, repo_path: &Path) -> Result<String, GitError> {
        remote_url(&open(repo_path)?)
    }

    fn search_for_tag(&self, repo_path: &Path, tag_ref: &str) -> Result<Tag, GitError> {
        search_for_tag(&open(repo_path)?, tag_ref)
    }
}

fn open(repo_path: &Path) -> Result<Repository, GitError> {
    Repository::open(repo_path).map_err(|source| GitError::OpenRepository {
        path: repo_path.to_path_buf(),
        source,
    })
}
