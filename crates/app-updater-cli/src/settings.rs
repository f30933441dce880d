//! TOML settings file for the updater CLI.
//!
//! ```toml
//! product = "studio"
//!
//! [github]
//! owner = "acme"
//! repo = "studio-desktop"
//!
//! [updates]
//! enabled = true
//! check_interval_hours = 24
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use app_updater::{Platform, UpdateSettings, UpdaterConfig, Version};
use serde::{Deserialize, Serialize};

/// File name looked up in the user configuration directory.
pub const SETTINGS_FILE: &str = "updater.toml";

/// Repository the releases are published from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubSource {
    pub owner: String,
    pub repo: String,
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Installer file name prefix.
    pub product: String,
    pub github: GithubSource,

    /// Endpoint overrides for mirrors.
    pub release_index_url: Option<String>,
    pub asset_base_url: Option<String>,
    pub download_page_url: Option<String>,

    /// Installer directory. Defaults to the per-user data directory of `product`.
    pub data_dir: Option<PathBuf>,
    pub installer_extension: Option<String>,
    pub timeout_secs: Option<u64>,

    pub updates: UpdateSettings,
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone)]
pub struct Overrides {
    pub current_version: Version,
    pub data_dir: Option<PathBuf>,
    pub platform: Option<Platform>,
}

impl CliSettings {
    /// Loads settings from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse settings in {}", path.display()))
    }

    /// Loads settings from `explicit`, or from the default location when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "app-updater")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Builds the updater configuration.
    ///
    /// Command-line overrides win over the file.
    pub fn resolve(&self, overrides: Overrides) -> Result<(UpdaterConfig, UpdateSettings)> {
        if self.product.trim().is_empty() {
            bail!("`product` is not set in the settings file");
        }
        if self.github.owner.is_empty() || self.github.repo.is_empty() {
            bail!("`github.owner` and `github.repo` must be set in the settings file");
        }

        let data_dir = match overrides.data_dir.or_else(|| self.data_dir.clone()) {
            Some(dir) => dir,
            None => default_data_dir(&self.product)
                .context("no home directory found; set `data_dir` explicitly")?,
        };

        let mut config = UpdaterConfig::github(
            self.product.clone(),
            &self.github.owner,
            &self.github.repo,
            overrides.current_version,
            data_dir,
        );
        if let Some(url) = &self.release_index_url {
            config.release_index_url = url.clone();
        }
        if let Some(url) = &self.asset_base_url {
            config.asset_base_url = url.clone();
        }
        if let Some(url) = &self.download_page_url {
            config.download_page_url = url.clone();
        }
        if let Some(extension) = &self.installer_extension {
            config.installer_extension = extension.clone();
        }
        config.timeout_secs = self.timeout_secs;
        config.platform = overrides.platform;

        config.validate().context("invalid updater settings")?;
        Ok((config, self.updates.clone()))
    }
}

/// Per-user data directory for `product`.
pub fn default_data_dir(product: &str) -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", product).map(|dirs| dirs.data_dir().to_path_buf())
}
