//! Background expiry sweep.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::store::ActiveProjectStore;

impl ActiveProjectStore {
    /// Spawns a task calling [`ActiveProjectStore::sweep_expired`] every
    /// `sweep_interval_secs` until `cancel` fires.
    ///
    /// The first sweep runs one full interval after spawning.
    pub fn spawn_expiry_sweep(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let period = Duration::from_secs(self.config().sweep_interval_secs.max(1));
        let store = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(
                "[ExpirySweep] Started with interval {}s",
                period.as_secs()
            );

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("[ExpirySweep] Cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        if store.sweep_expired().await {
                            tracing::info!("[ExpirySweep] Cleared expired active project");
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::active_project::ActiveProjectStore;
    use crate::notifier::Notifier;
    use chrono::{TimeZone, Utc};
    use eep_core::clock::ManualClock;
    use eep_core::config::ActiveProjectConfig;
    use eep_core::project::ActiveProject;
    use eep_core::workspace::ActiveWorkspace;
    use eep_infrastructure::{InMemoryProjectApi, MemorySnapshotSlot, SnapshotStorage};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn store(clock: &ManualClock) -> Arc<ActiveProjectStore> {
        let storage = SnapshotStorage::new(
            Arc::new(MemorySnapshotSlot::new()),
            Arc::new(clock.clone()),
        );
        Arc::new(ActiveProjectStore::new(
            ActiveProjectConfig::default(),
            Arc::new(storage),
            Arc::new(InMemoryProjectApi::new()),
            Notifier::disabled(),
            Arc::new(clock.clone()),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_clears_expired_selection() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
        let store = store(&clock);
        store
            .set_active(
                ActiveProject::minimal("p-1", "Robotics"),
                ActiveWorkspace::minimal("w-1", "Cohort 7"),
            )
            .await;

        let cancel = CancellationToken::new();
        let handle = store.spawn_expiry_sweep(cancel.clone());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(store.has_active().await);

        clock.advance(chrono::Duration::hours(25));
        for _ in 0..5 {
            if !store.has_active().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(61)).await;
        }
        assert!(!store.has_active().await);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_the_task() {
        let clock = ManualClock::new(Utc::now());
        let store = store(&clock);
        let cancel = CancellationToken::new();

        let handle = store.spawn_expiry_sweep(cancel.clone());
        cancel.cancel();

        handle.await.unwrap();
    }
}
