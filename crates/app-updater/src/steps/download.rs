//! Stream an installer to disk with progress logging.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::artifact::ArtifactStore;
use crate::error::{Result, UpdateError};
use crate::feed::ReleaseFeed;
use crate::version::Version;

/// Progress is logged each time another tenth of the file arrives.
const PROGRESS_STEPS: u64 = 10;

/// Tracks bytes written and decides when to log progress.
struct ProgressTracker {
    downloaded: u64,
    total: Option<u64>,
    last_step: u64,
}

impl ProgressTracker {
    fn new(total: Option<u64>) -> Self {
        Self {
            downloaded: 0,
            total: total.filter(|t| *t > 0),
            last_step: 0,
        }
    }

    /// Records `bytes` more and returns the percentage to log, if a new step was reached.
    fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.downloaded += bytes;
        let total = self.total?;

        let step = (self.downloaded.min(total) * PROGRESS_STEPS) / total;
        if step > self.last_step {
            self.last_step = step;
            Some((step * 100 / PROGRESS_STEPS) as u8)
        } else {
            None
        }
    }
}

/// Writes the body of `response` to `dest`, chunk by chunk.
///
/// Returns the number of bytes written. The file is flushed and synced before
/// returning.
pub async fn write_response_to_file(response: reqwest::Response, dest: &Path) -> Result<u64> {
    let total = response.content_length();
    let mut tracker = ProgressTracker::new(total);
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| UpdateError::Network(e.to_string()))?;
        file.write_all(&chunk).await?;

        if let Some(percent) = tracker.advance(chunk.len() as u64) {
            tracing::debug!(
                "Downloaded {}% ({} of {})",
                percent,
                format_bytes(tracker.downloaded),
                format_bytes(total.unwrap_or_default())
            );
        }
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(tracker.downloaded)
}

/// Downloads the installer for `version` from `url` into the artifact store.
///
/// The body is streamed to the `.part` path and only renamed to the final
/// installer path once complete, so a failed or interrupted download never
/// leaves a file that looks finished. The partial file is removed on failure.
pub async fn download_installer<F>(
    feed: &F,
    store: &ArtifactStore,
    url: &str,
    version: &Version,
) -> Result<PathBuf>
where
    F: ReleaseFeed,
{
    store.ensure_dir().await?;
    let partial = store.partial_path_for(version);

    tracing::info!("Downloading installer from {}", url);

    let written = match feed.download_to(url, &partial).await {
        Ok(written) => written,
        Err(e) => {
            store.discard_partial(version).await;
            return Err(e);
        }
    };

    match store.commit_partial(version).await {
        Ok(path) => {
            tracing::info!(
                "Installer ready: {} ({})",
                path.display(),
                format_bytes(written)
            );
            Ok(path)
        }
        Err(e) => {
            store.discard_partial(version).await;
            Err(e)
        }
    }
}

/// Format bytes as a human-readable string.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
