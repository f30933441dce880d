//! Update service facade.
//!
//! Wires one checker and one applier to the same [`UpdateState`] so that
//! whatever a check stages is what apply acts on.

use std::sync::Arc;

use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::feed::{HttpReleaseFeed, ReleaseFeed};
use crate::launcher::{Launcher, SystemLauncher};
use crate::notify::UpdateNotifier;
use crate::state::UpdateState;
use crate::steps::apply::{ApplyOutcome, UpdateApplier};
use crate::steps::check::{CheckOutcome, UpdateChecker};
use crate::version::Version;

/// Checker and applier sharing one update state.
#[derive(Debug)]
pub struct UpdateService<F, L> {
    config: Arc<UpdaterConfig>,
    state: Arc<UpdateState>,
    checker: UpdateChecker<F>,
    applier: UpdateApplier<L>,
}

impl UpdateService<HttpReleaseFeed, SystemLauncher> {
    /// Creates a service talking to the configured feed over HTTP and
    /// launching processes on this machine.
    pub fn from_config(config: UpdaterConfig) -> Result<Self> {
        config.validate()?;
        let feed = HttpReleaseFeed::from_config(&config)?;
        Ok(Self::new(config, feed, SystemLauncher))
    }
}

impl<F: ReleaseFeed, L: Launcher> UpdateService<F, L> {
    /// Creates a service from explicit collaborators.
    pub fn new(config: UpdaterConfig, feed: F, launcher: L) -> Self {
        let config = Arc::new(config);
        let state = Arc::new(UpdateState::new());

        Self {
            checker: UpdateChecker::new(Arc::clone(&config), feed, Arc::clone(&state)),
            applier: UpdateApplier::new(Arc::clone(&config), launcher, Arc::clone(&state)),
            config,
            state,
        }
    }

    /// Check for available updates. See [`UpdateChecker::check_for_update`].
    pub async fn check_for_update<N>(&self, notifier: &N) -> CheckOutcome
    where
        N: UpdateNotifier + ?Sized,
    {
        self.checker.check_for_update(notifier).await
    }

    /// Apply the pending update. See [`UpdateApplier::apply`].
    pub fn apply_update(&self) -> Result<ApplyOutcome> {
        self.applier.apply()
    }

    /// Version ready to apply, if any.
    #[must_use]
    pub fn pending_version(&self) -> Option<Version> {
        self.state.pending_version()
    }

    /// The shared state.
    #[must_use]
    pub fn state(&self) -> &Arc<UpdateState> {
        &self.state
    }

    /// The updater configuration.
    #[must_use]
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// The checker.
    #[must_use]
    pub fn checker(&self) -> &UpdateChecker<F> {
        &self.checker
    }

    /// The applier.
    #[must_use]
    pub fn applier(&self) -> &UpdateApplier<L> {
        &self.applier
    }
}
