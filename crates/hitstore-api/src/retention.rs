//! Periodic retention sweep.

use std::sync::Arc;
use std::time::Duration;

use hitstore_core::clock::Clock;
use hitstore_core::repository::HitEventStore;
use hitstore_history::application::command_handlers;
use hitstore_history::domain::window::RetentionPolicy;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Spawns a task that applies `policy` once immediately and then every
/// `interval`. Failures are logged and the next tick tries again.
///
/// The task runs until the returned handle is aborted. `interval` must be
/// non-zero; `Config` rejects a zero sweep interval.
pub fn spawn_retention_sweeper(
    policy: RetentionPolicy,
    interval: Duration,
    clock: Arc<dyn Clock>,
    store: Arc<dyn HitEventStore>,
) -> JoinHandle<()> {
    info!(
        max_age_days = policy.max_age_days(),
        interval_secs = interval.as_secs(),
        "starting retention sweeper"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match command_handlers::handle_apply_retention(policy, clock.as_ref(), store.as_ref())
                .await
            {
                Ok(cutoff) => info!(%cutoff, "retention sweep complete"),
                Err(e) => error!(error = %e, "retention sweep failed"),
            }
        }
    })
}
