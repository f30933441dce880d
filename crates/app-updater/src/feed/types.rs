//! Release feed response types.

use serde::Deserialize;

use crate::error::Result;
use crate::version::{self, Version};

/// Latest release as reported by the feed.
///
/// Only `tag_name` is required; the rest is informational.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRelease {
    /// The release tag name (e.g., "v1.2.3").
    pub tag_name: String,

    /// The release title/name.
    #[serde(default)]
    pub name: Option<String>,

    /// HTML URL to the release page.
    #[serde(default)]
    pub html_url: Option<String>,

    /// Whether this is a pre-release.
    #[serde(default)]
    pub prerelease: bool,
}

impl LatestRelease {
    /// Parses the tag as a semantic version.
    pub fn version(&self) -> Result<Version> {
        version::parse_tag(&self.tag_name)
    }

    /// Get the display name for this release.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.tag_name)
    }
}
