//! Release feed access.
//!
//! [`ReleaseFeed`] is what the checker talks to: one call for the latest
//! release metadata, one for streaming an installer to disk.
//! [`HttpReleaseFeed`] implements it over HTTPS with `reqwest`.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

pub mod client;
pub mod types;

pub use client::HttpReleaseFeed;
pub use types::LatestRelease;

/// Source of release metadata and installer downloads.
pub trait ReleaseFeed: Send + Sync {
    /// Fetches the latest published release.
    fn latest_release(&self) -> impl Future<Output = Result<LatestRelease>> + Send;

    /// Streams the resource at `url` into `dest`, returning the bytes written.
    ///
    /// `dest` is created or truncated.
    fn download_to(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64>> + Send;
}

impl<T: ReleaseFeed> ReleaseFeed for Arc<T> {
    fn latest_release(&self) -> impl Future<Output = Result<LatestRelease>> + Send {
        (**self).latest_release()
    }

    fn download_to(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64>> + Send {
        (**self).download_to(url, dest)
    }
}
