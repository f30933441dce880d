//! Configuration types for the update system.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UpdateError};
use crate::platform::{InstallMode, Platform};
use crate::version::Version;

/// GitHub API base URL.
const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub web base URL (release downloads and pages).
const GITHUB_URL: &str = "https://github.com";

/// Command-line flag passed to the installer when launched by the updater.
pub const DEFAULT_RELAUNCH_FLAG: &str = "--updated";

/// File extension of the in-place installer.
pub const DEFAULT_INSTALLER_EXTENSION: &str = "exe";

/// Everything the checker and applier need to know about the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Product name, used as the installer file name prefix.
    pub product: String,

    /// Version of the running build.
    pub current_version: Version,

    /// Per-user application data directory where installers are stored.
    pub data_dir: PathBuf,

    /// Endpoint returning the latest release as JSON.
    pub release_index_url: String,

    /// Base URL for release assets (`<base>/v<version>/<file>`).
    pub asset_base_url: String,

    /// Page opened on platforms without an in-place installer.
    pub download_page_url: String,

    /// Platform override. Detected at runtime when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Installer file extension.
    #[serde(default = "default_installer_extension")]
    pub installer_extension: String,

    /// Flag passed to the installer on launch.
    #[serde(default = "default_relaunch_flag")]
    pub relaunch_flag: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. Transport defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_installer_extension() -> String {
    DEFAULT_INSTALLER_EXTENSION.to_string()
}

fn default_relaunch_flag() -> String {
    DEFAULT_RELAUNCH_FLAG.to_string()
}

fn default_user_agent() -> String {
    concat!("app-updater/", env!("CARGO_PKG_VERSION")).to_string()
}

impl UpdaterConfig {
    /// Creates a configuration for a product released on GitHub.
    ///
    /// # Arguments
    /// * `product` - Installer file name prefix (e.g., "studio")
    /// * `owner` - The repository owner
    /// * `repo` - The repository name
    pub fn github(
        product: impl Into<String>,
        owner: &str,
        repo: &str,
        current_version: Version,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        let product = product.into();
        let user_agent = format!(
            "{product}-updater/{} (+{GITHUB_URL}/{owner}/{repo})",
            env!("CARGO_PKG_VERSION")
        );

        Self {
            product,
            current_version,
            data_dir: data_dir.into(),
            release_index_url: format!("{GITHUB_API_URL}/repos/{owner}/{repo}/releases/latest"),
            asset_base_url: format!("{GITHUB_URL}/{owner}/{repo}/releases/download"),
            download_page_url: format!("{GITHUB_URL}/{owner}/{repo}/releases/latest"),
            platform: None,
            installer_extension: default_installer_extension(),
            relaunch_flag: default_relaunch_flag(),
            user_agent,
            timeout_secs: None,
        }
    }

    /// Overrides the detected platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the page opened on manual-download platforms.
    #[must_use]
    pub fn with_download_page(mut self, url: impl Into<String>) -> Self {
        self.download_page_url = url.into();
        self
    }

    /// Sets the release index and asset base URLs.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        release_index_url: impl Into<String>,
        asset_base_url: impl Into<String>,
    ) -> Self {
        self.release_index_url = release_index_url.into();
        self.asset_base_url = asset_base_url.into();
        self
    }

    /// Sets a request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Returns the effective platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    /// Returns how updates are installed for the effective platform.
    #[must_use]
    pub fn install_mode(&self) -> InstallMode {
        self.platform().install_mode()
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Builds the download URL of the installer for `version`.
    #[must_use]
    pub fn asset_url(&self, version: &Version, file_name: &str) -> String {
        format!(
            "{}/v{}/{}",
            self.asset_base_url.trim_end_matches('/'),
            version,
            file_name
        )
    }

    /// Checks the configuration for values that would make every check fail.
    pub fn validate(&self) -> Result<()> {
        if self.product.trim().is_empty() {
            return Err(UpdateError::Config("product name is empty".to_string()));
        }
        if self.product.contains(['/', '\\']) {
            return Err(UpdateError::Config(format!(
                "product name '{}' must not contain path separators",
                self.product
            )));
        }
        if self.installer_extension.is_empty() || self.installer_extension.starts_with('.') {
            return Err(UpdateError::Config(format!(
                "installer extension '{}' must be non-empty and without a leading dot",
                self.installer_extension
            )));
        }

        for (field, value) in [
            ("release_index_url", &self.release_index_url),
            ("asset_base_url", &self.asset_base_url),
            ("download_page_url", &self.download_page_url),
        ] {
            Url::parse(value)
                .map_err(|e| UpdateError::Config(format!("{field} '{value}' is not a URL: {e}")))?;
        }

        Ok(())
    }
}

/// User settings controlling when checks run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettings {
    /// Whether update checking is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Hours between automatic checks.
    #[serde(default = "default_check_interval_hours")]
    pub check_interval_hours: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_check_interval_hours() -> u64 {
    24
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            check_interval_hours: default_check_interval_hours(),
        }
    }
}

impl UpdateSettings {
    /// Interval between automatic checks (at least one hour).
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Self::interval_for_hours(self.check_interval_hours)
    }

    /// Converts an hour count into a check interval, clamped to one hour at
    /// the low end and saturating at the high end.
    #[must_use]
    pub fn interval_for_hours(hours: u64) -> Duration {
        Duration::from_secs(hours.max(1).saturating_mul(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UpdaterConfig {
        UpdaterConfig::github(
            "studio",
            "acme",
            "studio-desktop",
            Version::new(1, 0, 0),
            "/tmp/studio",
        )
    }

    #[test]
    fn test_github_urls() {
        let config = config();
        assert_eq!(
            config.release_index_url,
            "https://api.github.com/repos/acme/studio-desktop/releases/latest"
        );
        assert_eq!(
            config.asset_base_url,
            "https://github.com/acme/studio-desktop/releases/download"
        );
        assert!(config.user_agent.starts_with("studio-updater/"));
        assert_eq!(config.relaunch_flag, "--updated");
        assert_eq!(config.installer_extension, "exe");
    }

    #[test]
    fn test_asset_url() {
        let config = config().with_endpoints("https://feed.test/latest", "https://cdn.test/dl/");
        let url = config.asset_url(&Version::new(1, 1, 0), "studio.setup.1.1.0.exe");
        assert_eq!(url, "https://cdn.test/dl/v1.1.0/studio.setup.1.1.0.exe");
    }

    #[test]
    fn test_platform_override() {
        let config = config().with_platform(Platform::Windows);
        assert_eq!(config.platform(), Platform::Windows);
        assert_eq!(config.install_mode(), InstallMode::InPlaceInstaller);

        let config = config.with_platform(Platform::Linux);
        assert_eq!(config.install_mode(), InstallMode::ManualDownload);
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());

        let mut bad = config();
        bad.product = "../evil".to_string();
        assert!(matches!(bad.validate(), Err(UpdateError::Config(_))));

        let bad = config().with_download_page("not a url");
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.installer_extension = ".exe".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "product": "studio",
            "current_version": "2.3.4",
            "data_dir": "/data",
            "release_index_url": "https://feed.test/latest",
            "asset_base_url": "https://feed.test/download",
            "download_page_url": "https://studio.test/download"
        }"#;
        let config: UpdaterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.current_version, Version::new(2, 3, 4));
        assert_eq!(config.installer_extension, "exe");
        assert_eq!(config.relaunch_flag, "--updated");
        assert!(config.platform.is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_default_settings() {
        let settings = UpdateSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.check_interval_hours, 24);
        assert_eq!(settings.check_interval(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_check_interval_floor() {
        let settings = UpdateSettings {
            check_interval_hours: 0,
            ..UpdateSettings::default()
        };
        assert_eq!(settings.check_interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_check_interval_saturates() {
        let settings: UpdateSettings =
            serde_json::from_str(r#"{"check_interval_hours": 9223372036854775807}"#).unwrap();
        assert_eq!(settings.check_interval(), Duration::from_secs(u64::MAX));
        assert_eq!(
            UpdateSettings::interval_for_hours(u64::MAX),
            Duration::from_secs(u64::MAX)
        );
    }
}
