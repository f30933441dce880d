//! "Update available" signal towards the UI layer.
//!
//! The signal carries no payload. The receiver prompts the user and later
//! asks the applier to act; the pending version lives in `UpdateState`.

use tokio::sync::mpsc::UnboundedSender;

/// Receives the "update available" signal.
pub trait UpdateNotifier: Send + Sync {
    /// Called once per check that found an update ready to apply.
    fn update_available(&self);
}

impl<F> UpdateNotifier for F
where
    F: Fn() + Send + Sync,
{
    fn update_available(&self) {
        self()
    }
}

/// Message sent by [`ChannelNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAvailable;

/// Forwards the signal into a tokio channel, e.g. a UI event loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<UpdateAvailable>,
}

impl ChannelNotifier {
    /// Wraps a channel sender.
    #[must_use]
    pub fn new(sender: UnboundedSender<UpdateAvailable>) -> Self {
        Self { sender }
    }
}

impl UpdateNotifier for ChannelNotifier {
    fn update_available(&self) {
        if self.sender.send(UpdateAvailable).is_err() {
            tracing::debug!("Update notification dropped: receiver closed");
        }
    }
}
