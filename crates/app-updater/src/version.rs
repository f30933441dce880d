//! Semantic versioning support for update comparisons.
//!
//! Release tags come from the feed with a leading `v` (e.g. "v1.2.3"). Ordering
//! follows semver precedence: pre-releases sort below their release and build
//! metadata is ignored.

use std::cmp::Ordering;

pub use semver::Version;

use crate::error::{Result, UpdateError};

/// Parse a version from a release tag, stripping a leading `v` prefix.
pub fn parse_tag(tag: &str) -> Result<Version> {
    let trimmed = tag.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    Version::parse(bare).map_err(|e| UpdateError::InvalidVersion(format!("{tag}: {e}")))
}

/// Compare two versions by semver precedence, ignoring build metadata.
#[must_use]
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Returns `true` when `latest` is strictly newer than `current`.
#[must_use]
pub fn is_newer(latest: &Version, current: &Version) -> bool {
    cmp_precedence(latest, current) == Ordering::Greater
}
