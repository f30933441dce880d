//! Hand off to the installer or the download page.

use std::path::PathBuf;
use std::sync::Arc;

use crate::artifact::ArtifactStore;
use crate::config::UpdaterConfig;
use crate::error::{Result, UpdateError};
use crate::launcher::Launcher;
use crate::platform::InstallMode;
use crate::state::UpdateState;
use crate::version::Version;

/// What applying did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No update was pending; nothing happened.
    NothingToApply,
    /// The installer was started and termination was requested.
    InstallerLaunched {
        /// Version being installed.
        version: Version,
        /// Installer that was started.
        installer: PathBuf,
    },
    /// The download page was opened; the application keeps running.
    DownloadPageOpened {
        /// Version available for download.
        version: Version,
    },
}

/// Applies the update recorded in the shared state.
#[derive(Debug)]
pub struct UpdateApplier<L> {
    config: Arc<UpdaterConfig>,
    launcher: L,
    store: ArtifactStore,
    state: Arc<UpdateState>,
}

impl<L: Launcher> UpdateApplier<L> {
    /// Creates an applier reading from `state`.
    pub fn new(config: Arc<UpdaterConfig>, launcher: L, state: Arc<UpdateState>) -> Self {
        let store = ArtifactStore::from_config(&config);
        Self {
            config,
            launcher,
            store,
            state,
        }
    }

    /// The launcher used for hand-off.
    #[must_use]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Applies the pending update, if any.
    ///
    /// On in-place installer platforms the installer is started detached with
    /// the relaunch flag and the launcher is asked to terminate the
    /// application. If the installer is missing or cannot be started, an
    /// error is returned and the application keeps running. Elsewhere the
    /// download page is opened and the application keeps running.
    pub fn apply(&self) -> Result<ApplyOutcome> {
        let Some(version) = self.state.pending_version() else {
            tracing::debug!("No update ready to apply");
            return Ok(ApplyOutcome::NothingToApply);
        };

        match self.config.install_mode() {
            InstallMode::InPlaceInstaller => self.launch_installer(version),
            InstallMode::ManualDownload => {
                let url = &self.config.download_page_url;
                tracing::info!("Opening download page {} for v{}", url, version);
                self.launcher.open_url(url)?;
                Ok(ApplyOutcome::DownloadPageOpened { version })
            }
        }
    }

    fn launch_installer(&self, version: Version) -> Result<ApplyOutcome> {
        let installer = self.store.path_for(&version);
        if !installer.is_file() {
            tracing::warn!("Installer for v{} is missing at {}", version, installer.display());
            return Err(UpdateError::ArtifactMissing(installer));
        }

        tracing::info!("Launching installer {}", installer.display());
        self.launcher
            .spawn_detached(&installer, &[self.config.relaunch_flag.as_str()])?;

        self.launcher.terminate();

        Ok(ApplyOutcome::InstallerLaunched { version, installer })
    }
}
