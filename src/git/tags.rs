//! Tag lookup and timestamp resolution.

use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, Repository};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GitError;

/// A git tag and the commit time of the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// Resolve a tag name to a [`Tag`].
///
/// Only tags are accepted: branch names and commit hashes fail with
/// [`GitError::TagNotFound`]. Annotated tags are peeled to their commit, so the
/// timestamp is always the committer time of the tagged commit.
pub fn search_for_tag(repo: &Repository, tag_ref: &str) -> Result<Tag, GitError> {
    let name = tag_ref.strip_prefix("refs/tags/").unwrap_or(tag_ref);
    if name.is_empty() {
        return Err(GitError::TagNotFound(tag_ref.to_string()));
    }

    let reference = match repo.find_reference(&format!("refs/tags/{name}")) {
        Ok(reference) => reference,
        Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
            return Err(GitError::TagNotFound(name.to_string()));
        }
        Err(e) => return Err(GitError::TagLookup(name.to_string(), e)),
    };

    let commit = reference
        .peel_to_commit()
        .map_err(|e| GitError::PeelTag(name.to_string(), e))?;

    let seconds = commit.time().seconds();
    let timestamp = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| GitError::InvalidTimestamp {
            tag: name.to_string(),
            seconds,
        })?;

    debug!(tag = %name, commit = %commit.id(), %timestamp, "Resolved tag");

    Ok(Tag {
        name: name.to_string(),
        timestamp,
    })
}
