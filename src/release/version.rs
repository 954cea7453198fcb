//! Next-version speculation from categorized changes.

use std::path::Path;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::VersionError;
use crate::github::labels::ChangeTypeTable;

use super::ChangeSummary;

/// Type of version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

/// Determine the bump type from a list of changes.
///
/// The highest bump across every change type of every change wins. Change
/// types unknown to the table count as patches, as does an empty list.
pub fn determine_bump_type(changes: &[ChangeSummary], table: &ChangeTypeTable) -> BumpType {
    changes
        .iter()
        .flat_map(|change| change.change_types.iter())
        .map(|name| {
            table
                .definition(name)
                .map(|def| def.bump)
                .unwrap_or(BumpType::Patch)
        })
        .max()
        .unwrap_or(BumpType::Patch)
}

/// Apply a bump to a version.
///
/// With `enforce_v0`, a major bump of a `0.x` version is downgraded to a minor bump.
pub fn calculate_next_version(base: &Version, bump: BumpType, enforce_v0: bool) -> Version {
    let bump = if enforce_v0 && base.major == 0 && bump == BumpType::Major {
        BumpType::Minor
    } else {
        bump
    };

    match bump {
        BumpType::Major => Version::new(base.major + 1, 0, 0),
        BumpType::Minor => Version::new(base.major, base.minor + 1, 0),
        BumpType::Patch => Version::new(base.major, base.minor, base.patch + 1),
    }
}

/// Guess the version that follows `since_version` given the changes made since.
///
/// A leading `v` on `since_version` is carried over to the result.
pub fn speculate_next_version(
    since_version: &str,
    changes: &[ChangeSummary],
    table: &ChangeTypeTable,
    enforce_v0: bool,
) -> Result<String, VersionError> {
    let (prefix, raw) = match since_version.strip_prefix('v') {
        Some(rest) => ("v", rest),
        None => ("", since_version),
    };
    let base = Version::parse(raw)
        .map_err(|e| VersionError::ParseFailed(since_version.to_string(), e))?;

    let next = calculate_next_version(&base, determine_bump_type(changes, table), enforce_v0);
    Ok(format!("{prefix}{next}"))
}

/// Write `version` to `path`, replacing any previous contents.
pub fn write_version_file(path: &Path, version: &str) -> Result<(), VersionError> {
    std::fs::write(path, version).map_err(|source| VersionError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
