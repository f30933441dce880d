//! Error types for the update system.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while checking for or applying an update.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UpdateError {
    /// Failed to parse a version string or release tag.
    #[error("invalid version format: {0}")]
    InvalidVersion(String),

    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// GitHub API rate limit exceeded.
    #[error("GitHub API rate limit exceeded, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds until rate limit resets.
        retry_after: u64,
    },

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(String),

    /// The installer for the pending version is not on disk.
    #[error("installer not found at {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// The installer process could not be started.
    #[error("failed to launch installer {path}: {reason}")]
    Spawn {
        /// Installer path.
        path: String,
        /// Underlying OS error.
        reason: String,
    },

    /// The download page could not be opened.
    #[error("failed to open {url}: {reason}")]
    BrowserLaunch {
        /// Download page URL.
        url: String,
        /// Underlying error.
        reason: String,
    },

    /// Invalid updater configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl UpdateError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) | Self::HttpStatus { .. } => {
                "Could not reach the update server. Please check your internet connection."
            }
            Self::RateLimited { .. } => "Update server rate limit reached. Please try again later.",
            Self::ArtifactMissing(_) => {
                "The downloaded update could not be found. It will be downloaded again on the next check."
            }
            Self::Spawn { .. } => "Could not start the installer. Please try again.",
            Self::BrowserLaunch { .. } => "Could not open the download page in your browser.",
            Self::InvalidVersion(_) | Self::Io(_) | Self::JsonParse(_) | Self::Config(_) => {
                "An unexpected error occurred."
            }
        }
    }

    /// Returns whether this error is potentially recoverable on a later check.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::HttpStatus { .. }
                | Self::RateLimited { .. }
                | Self::Io(_)
                | Self::ArtifactMissing(_)
        )
    }
}

impl From<reqwest::Error> for UpdateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::JsonParse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for UpdateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for UpdateError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for update operations.
pub type Result<T> = std::result::Result<T, UpdateError>;
