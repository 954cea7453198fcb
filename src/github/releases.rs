//! Release fetching and selection.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitHubError;

use super::issues::{MAX_PAGES, PER_PAGE, classify_error, is_not_found};
use super::retry::{RetryPolicy, retry_with_backoff};

/// A GitHub release as seen when scanning for the latest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub tag: String,
    pub date: DateTime<Utc>,
    pub draft: bool,
}

impl ReleaseInfo {
    /// Convert an API release, dated by its publish time or else its creation time.
    ///
    /// Returns `None` when GitHub reports neither.
    fn from_model(release: octocrab::models::repos::Release) -> Option<Self> {
        let date = release.published_at.or(release.created_at)?;
        Some(Self {
            tag: release.tag_name,
            date,
            draft: release.draft,
        })
    }
}

/// The first release in `releases` that is not a draft.
///
/// GitHub lists releases newest first, so this is the latest published release.
pub fn latest_non_draft_release(releases: &[ReleaseInfo]) -> Option<&ReleaseInfo> {
    releases.iter().find(|release| !release.draft)
}

/// Fetch every release of a repository, in the order GitHub lists them.
pub async fn fetch_all_releases_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    retry: &RetryPolicy,
) -> Result<Vec<ReleaseInfo>, GitHubError> {
    let mut all_releases = Vec::new();
    let mut page = 1u32;

    loop {
        let releases_page = retry_with_backoff(retry, || async move {
            octocrab
                .repos(owner, repo)
                .releases()
                .list()
                .per_page(PER_PAGE)
                .page(page)
                .send()
                .await
                .map_err(|e| classify_error(e, "releases", owner, repo))
        })
        .await?;

        let has_next = releases_page.next.is_some();
        if releases_page.items.is_empty() {
            break;
        }

        for release in releases_page.items {
            let tag = release.tag_name.clone();
            match ReleaseInfo::from_model(release) {
                Some(info) => all_releases.push(info),
                None => debug!(%tag, "Skipping release without a date"),
            }
        }

        if !has_next {
            break;
        }

        page += 1;

        if page > MAX_PAGES {
            warn!(
                "Reached {}-page safety limit while fetching releases for {}/{}",
                MAX_PAGES, owner, repo
            );
            break;
        }
    }

    debug!(count = all_releases.len(), "Fetched releases for {}/{}", owner, repo);

    Ok(all_releases)
}

/// Fetch the release published for `tag`.
pub async fn fetch_release_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    tag: &str,
    retry: &RetryPolicy,
) -> Result<ReleaseInfo, GitHubError> {
    let release = retry_with_backoff(retry, || async move {
        octocrab
            .repos(owner, repo)
            .releases()
            .get_by_tag(tag)
            .await
            .map_err(|e| {
                // A missing tag and a missing repository both come back as 404
                if is_not_found(&e.to_string(), &format!("{:?}", e)) {
                    GitHubError::ReleaseNotFound {
                        tag: tag.to_string(),
                    }
                } else {
                    classify_error(e, "release", owner, repo)
                }
            })
    })
    .await?;

    ReleaseInfo::from_model(release).ok_or_else(|| GitHubError::MissingReleaseDate {
        tag: tag.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn release(tag: &str, day: u32, draft: bool) -> ReleaseInfo {
        ReleaseInfo {
            tag: tag.to_string(),
            date: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
            draft,
        }
    }

    #[test]
    fn test_latest_skips_newer_draft() {
        let releases = vec![release("v1.3.0", 20, true), release("v1.2.0", 10, false)];
        let latest = latest_non_draft_release(&releases).unwrap();
        assert_eq!(latest.tag, "v1.2.0");
    }

    #[test]
    fn test_latest_takes_first_in_list_order() {
        // List order decides, not the date
        let releases = vec![release("v1.0.0", 1, false), release("v1.1.0", 15, false)];
        assert_eq!(latest_non_draft_release(&releases).unwrap().tag, "v1.0.0");
    }

    #[test]
    fn test_latest_none_when_all_drafts() {
        let releases = vec![release("v2.0.0", 20, true), release("v1.9.0", 10, true)];
        assert!(latest_non_draft_release(&releases).is_none());
    }

    #[test]
    fn test_latest_none_when_empty() {
        assert!(latest_non_draft_release(&[]).is_none());
    }
}
