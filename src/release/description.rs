//! Assemble everything a changelog needs for one release.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DescribeError;
use crate::github::labels::{ChangeType, ChangeTypeTable};

use super::version::speculate_next_version;
use super::{ChangeSummary, Release, Summarizer};

/// Version shown for changes that are not part of any release yet.
pub const UNRELEASED: &str = "(Unreleased)";

const HEAD: &str = "HEAD";

/// Which range to describe and how to name its release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionOptions {
    /// Start of the range; the latest published release when unset.
    pub since_tag: Option<String>,
    /// End of the range; unbounded (up to HEAD) when unset.
    pub until_tag: Option<String>,
    pub speculate_next_version: bool,
    pub enforce_v0: bool,
}

/// A release and the changes that went into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub release: Release,
    pub vcs_reference_url: String,
    pub vcs_changes_url: String,
    pub changes: Vec<ChangeSummary>,
    pub supported_changes: Vec<ChangeType>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Describe the release covering `options`' range.
pub async fn create_description<S>(
    summarizer: &S,
    change_types: &ChangeTypeTable,
    options: &DescriptionOptions,
) -> Result<Description, DescribeError>
where
    S: Summarizer + ?Sized,
{
    let since = match non_empty(&options.since_tag) {
        Some(tag) => tag.to_string(),
        None => {
            let last = summarizer.last_release().await?;
            info!(since = %last.version, "No since tag given, using the latest release");
            last.version
        }
    };
    let until = non_empty(&options.until_tag);

    let changes = summarizer.changes(&since, until.unwrap_or("")).await?;

    let (release, reference) = match until {
        Some(tag) => (summarizer.release(tag).await?, tag.to_string()),
        None => {
            let version = if options.speculate_next_version {
                let next =
                    speculate_next_version(&since, &changes, change_types, options.enforce_v0)?;
                info!(since = %since, next = %next, "Speculated next version");
                next
            } else {
                UNRELEASED.to_string()
            };
            (
                Release {
                    version,
                    date: Utc::now(),
                },
                HEAD.to_string(),
            )
        }
    };

    Ok(Description {
        vcs_reference_url: summarizer.tag_url(&reference),
        vcs_changes_url: summarizer.changes_url(&since, until.unwrap_or(HEAD)),
        release,
        changes,
        supported_changes: change_types.definitions().to_vec(),
    })
}
