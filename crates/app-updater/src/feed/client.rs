//! HTTP client for the release feed.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use super::ReleaseFeed;
use super::types::LatestRelease;
use crate::config::UpdaterConfig;
use crate::error::{Result, UpdateError};
use crate::steps::download::write_response_to_file;

/// Release feed served over HTTP(S), typically the GitHub Releases API.
#[derive(Debug, Clone)]
pub struct HttpReleaseFeed {
    client: reqwest::Client,
    release_index_url: String,
}

impl HttpReleaseFeed {
    /// Creates a client for the given release index endpoint.
    ///
    /// # Arguments
    /// * `release_index_url` - Endpoint returning the latest release as JSON
    /// * `user_agent` - Value of the `User-Agent` header (required by GitHub)
    /// * `timeout` - Per-request timeout; `None` keeps transport defaults
    pub fn new(
        release_index_url: impl Into<String>,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| UpdateError::Config(format!("invalid user agent: {e}")))?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| UpdateError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            release_index_url: release_index_url.into(),
        })
    }

    /// Creates a client from the updater configuration.
    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        Self::new(
            config.release_index_url.clone(),
            &config.user_agent,
            config.timeout(),
        )
    }

    /// The release index endpoint.
    #[must_use]
    pub fn release_index_url(&self) -> &str {
        &self.release_index_url
    }

    /// Checks the response status, mapping GitHub rate limiting separately.
    fn check_status(response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|remaining| remaining.to_str().unwrap_or("1") == "0")
        {
            let retry_after = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|reset| {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_secs())
                        .unwrap_or(0);
                    reset.saturating_sub(now)
                })
                .unwrap_or(60);

            return Err(UpdateError::RateLimited { retry_after });
        }

        if !status.is_success() {
            return Err(UpdateError::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        Ok(())
    }
}

impl ReleaseFeed for HttpReleaseFeed {
    async fn latest_release(&self) -> Result<LatestRelease> {
        tracing::debug!("Fetching latest release from {}", self.release_index_url);

        let response = self
            .client
            .get(&self.release_index_url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;
        Self::check_status(&response)?;

        let body = response.bytes().await?;
        let release: LatestRelease = serde_json::from_slice(&body)?;

        Ok(release)
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await?;
        Self::check_status(&response)?;

        write_response_to_file(response, dest).await
    }
}
