//! Check for available updates and stage the installer.

use std::sync::Arc;

use tracing::Instrument;

use crate::artifact::ArtifactStore;
use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::feed::ReleaseFeed;
use crate::notify::UpdateNotifier;
use crate::platform::InstallMode;
use crate::state::UpdateState;
use crate::steps::download::download_installer;
use crate::version::{self, Version};

/// What a single check did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The feed reports nothing newer than the running version.
    UpToDate {
        /// Running version.
        current: Version,
        /// Latest version reported by the feed.
        latest: Version,
    },
    /// A newer installer was downloaded and is ready to apply.
    Downloaded(Version),
    /// The installer for the newer version was already on disk.
    AlreadyDownloaded(Version),
    /// A newer version exists; applying it means visiting the download page.
    ManualUpdateAvailable(Version),
    /// The check was abandoned; it will be retried on the next cycle.
    Failed {
        /// Logged failure description.
        reason: String,
    },
    /// Another check was still running, so this one did nothing.
    AlreadyRunning,
}

impl CheckOutcome {
    /// Returns the version ready to apply, if this check produced one.
    #[must_use]
    pub fn ready_version(&self) -> Option<&Version> {
        match self {
            Self::Downloaded(v) | Self::AlreadyDownloaded(v) | Self::ManualUpdateAvailable(v) => {
                Some(v)
            }
            Self::UpToDate { .. } | Self::Failed { .. } | Self::AlreadyRunning => None,
        }
    }

    /// Returns whether this check signalled an available update.
    #[must_use]
    pub fn is_update_available(&self) -> bool {
        self.ready_version().is_some()
    }
}

/// Queries the release feed and prepares newer versions for the applier.
#[derive(Debug)]
pub struct UpdateChecker<F> {
    config: Arc<UpdaterConfig>,
    feed: F,
    store: ArtifactStore,
    state: Arc<UpdateState>,
}

impl<F: ReleaseFeed> UpdateChecker<F> {
    /// Creates a checker writing into `state`.
    pub fn new(config: Arc<UpdaterConfig>, feed: F, state: Arc<UpdateState>) -> Self {
        let store = ArtifactStore::from_config(&config);
        Self {
            config,
            feed,
            store,
            state,
        }
    }

    /// The artifact store used for installers.
    #[must_use]
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Runs one update check.
    ///
    /// Never fails: every error is logged and reported as
    /// [`CheckOutcome::Failed`]. When a newer version is ready, the state is
    /// updated first and then `notifier` is signalled exactly once.
    pub async fn check_for_update<N>(&self, notifier: &N) -> CheckOutcome
    where
        N: UpdateNotifier + ?Sized,
    {
        let Some(_guard) = self.state.try_begin_check() else {
            tracing::debug!("Update check already in progress, skipping");
            return CheckOutcome::AlreadyRunning;
        };

        let span = tracing::info_span!(
            "update_check",
            current = %self.config.current_version,
            platform = %self.config.platform()
        );

        match self.run_check(notifier).instrument(span).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Error while checking for update: {}", e);
                CheckOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn run_check<N>(&self, notifier: &N) -> Result<CheckOutcome>
    where
        N: UpdateNotifier + ?Sized,
    {
        let current = &self.config.current_version;
        tracing::info!("Checking for updates (current version: {})", current);

        // Installer of the build that is now running, left from the last update.
        self.store.remove_stale(current).await;

        let release = self.feed.latest_release().await?;
        let latest = release.version()?;

        if !version::is_newer(&latest, current) {
            tracing::info!(
                "Application is up to date (current: {}, latest: {})",
                current,
                latest
            );
            return Ok(CheckOutcome::UpToDate {
                current: current.clone(),
                latest,
            });
        }

        tracing::info!("Found a new version v{} ({})", latest, release.display_name());
        if release.prerelease {
            tracing::warn!("v{} is marked as a pre-release", latest);
        }
        if let Some(url) = &release.html_url {
            tracing::debug!("Release notes: {}", url);
        }

        match self.config.install_mode() {
            InstallMode::InPlaceInstaller => Ok(self.stage_installer(latest, notifier).await),
            InstallMode::ManualDownload => {
                self.mark_ready(&latest, notifier);
                Ok(CheckOutcome::ManualUpdateAvailable(latest))
            }
        }
    }

    /// Makes sure the installer for `latest` is on disk.
    async fn stage_installer<N>(&self, latest: Version, notifier: &N) -> CheckOutcome
    where
        N: UpdateNotifier + ?Sized,
    {
        if self.store.exists(&latest).await {
            tracing::info!("Installer for v{} already downloaded", latest);
            self.mark_ready(&latest, notifier);
            return CheckOutcome::AlreadyDownloaded(latest);
        }

        let url = self
            .config
            .asset_url(&latest, &self.store.file_name(&latest));

        match download_installer(&self.feed, &self.store, &url, &latest).await {
            Ok(_) => {
                self.mark_ready(&latest, notifier);
                CheckOutcome::Downloaded(latest)
            }
            Err(e) => {
                tracing::error!("Error while downloading the installer: {}", e);
                CheckOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn mark_ready<N>(&self, version: &Version, notifier: &N)
    where
        N: UpdateNotifier + ?Sized,
    {
        self.state.set_pending(version.clone());
        notifier.update_available();
    }
}
