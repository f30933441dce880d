//! Periodic update checks.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::feed::ReleaseFeed;
use crate::launcher::Launcher;
use crate::notify::UpdateNotifier;
use crate::service::UpdateService;

/// Runs a check immediately and then once per `every` until `shutdown` resolves.
///
/// A resolved `shutdown` wins over a due tick. Checks never overlap: the next
/// tick is only awaited after the previous check returned, and ticks missed
/// while a check ran are delayed, not replayed. A check in flight is not
/// interrupted by `shutdown`.
pub async fn run_periodic<F, L, N, S>(
    service: &UpdateService<F, L>,
    notifier: &N,
    every: Duration,
    shutdown: S,
) where
    F: ReleaseFeed,
    L: Launcher,
    N: UpdateNotifier + ?Sized,
    S: Future<Output = ()>,
{
    tracing::info!("Checking for updates every {:?}", every);

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Stopping periodic update checks");
                break;
            }
            _ = ticker.tick() => {
                let outcome = service.check_for_update(notifier).await;
                tracing::debug!("Periodic update check finished: {:?}", outcome);
            }
        }
    }
}
