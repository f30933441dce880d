//! Self-update support for desktop applications.
//!
//! This crate checks a release feed for a newer version, stages the
//! platform installer in the per-user data directory, and hands off to it.
//!
//! # Overview
//!
//! - Release metadata comes from a feed (the GitHub Releases API by default).
//! - Versions are compared with semver precedence; a leading `v` is stripped
//!   from tags.
//! - On Windows the installer `<product>.setup.<version>.exe` is downloaded
//!   once and reused on later checks. Other platforms are pointed at the
//!   download page instead.
//! - Installers are launched detached with `--updated`, then the application
//!   exits so the installer can replace its files.
//!
//! # Architecture
//!
//! - [`UpdateChecker`] - runs a check, stages the installer, records the
//!   version in [`UpdateState`] and signals an [`UpdateNotifier`]
//! - [`UpdateApplier`] - acts on the version recorded in [`UpdateState`]
//!   through a [`Launcher`]
//! - [`UpdateService`] - owns both and the shared state
//! - [`run_periodic`] - drives checks on an interval
//!
//! Only one check runs at a time per state; an overlapping call returns
//! [`CheckOutcome::AlreadyRunning`].
//!
//! # Example
//!
//! ```no_run
//! use app_updater::{UpdateService, UpdaterConfig, Version};
//!
//! async fn check_updates() -> app_updater::Result<()> {
//!     let config = UpdaterConfig::github(
//!         "studio",
//!         "acme",
//!         "studio-desktop",
//!         Version::new(1, 0, 0),
//!         "/home/me/.local/share/studio",
//!     );
//!     let service = UpdateService::from_config(config)?;
//!
//!     let outcome = service
//!         .check_for_update(&|| println!("Update ready, restart to install"))
//!         .await;
//!     println!("{outcome:?}");
//!
//!     if service.pending_version().is_some() {
//!         service.apply_update()?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod artifact;
pub mod config;
pub mod error;
pub mod platform;
pub mod state;
pub mod version;

// Individual steps
pub mod steps;

// Release feed
pub mod feed;

// Collaborators
pub mod launcher;
pub mod notify;

// Orchestration
pub mod scheduler;
pub mod service;

// Re-export main types for convenience
pub use artifact::ArtifactStore;
pub use config::{UpdateSettings, UpdaterConfig};
pub use error::{Result, UpdateError};
pub use feed::{HttpReleaseFeed, LatestRelease, ReleaseFeed};
pub use launcher::{Launcher, SystemLauncher};
pub use notify::{ChannelNotifier, UpdateAvailable, UpdateNotifier};
pub use platform::{InstallMode, Platform};
pub use scheduler::run_periodic;
pub use service::UpdateService;
pub use state::UpdateState;
pub use steps::apply::{ApplyOutcome, UpdateApplier};
pub use steps::check::{CheckOutcome, UpdateChecker};
pub use steps::download::format_bytes;
pub use version::Version;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
