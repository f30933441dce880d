//! Platform detection and per-platform install strategy.
//!
//! - **Windows**: the installer executable is downloaded into the data
//!   directory and launched in place.
//! - **macOS / Linux / others**: nothing is downloaded; applying an update
//!   opens the product's download page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating system the application is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    MacOs,
    /// Linux distributions.
    Linux,
    /// Anything else (BSDs, ...).
    Other,
}

/// How an update is delivered on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Download the installer and launch it directly.
    InPlaceInstaller,
    /// Send the user to the download page.
    ManualDownload,
}

impl Platform {
    /// Detects the platform of the running process.
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to a platform.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Returns how updates are installed on this platform.
    #[must_use]
    pub const fn install_mode(self) -> InstallMode {
        match self {
            Self::Windows => InstallMode::InPlaceInstaller,
            Self::MacOs | Self::Linux | Self::Other => InstallMode::ManualDownload,
        }
    }

    /// Get a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
