//! Interval spawn loop

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use notify_common::SpawnerConfig;
use notify_service::dto::SpawnReport;
use notify_service::{ServiceContext, ServiceResult, SpawnService};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument};

/// Periodically spawns due notifications
pub struct SpawnWorker {
    ctx: ServiceContext,
    interval: Duration,
    batch_size: i64,
}

impl SpawnWorker {
    pub fn new(ctx: ServiceContext, config: &SpawnerConfig) -> Self {
        Self {
            ctx,
            interval: config.interval(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Sweep the due queue once, in passes of `batch_size` rows
    ///
    /// Each pass resumes after the last row the previous one examined, so
    /// rows left due by a skip never hide the ones queued behind them. The
    /// sweep ends on the first pass that comes back short.
    #[instrument(skip(self))]
    pub async fn tick(&self) -> ServiceResult<SpawnReport> {
        let service = SpawnService::new(&self.ctx);
        let now = Utc::now();
        let mut total = SpawnReport::default();
        let mut cursor = None;

        loop {
            let pass = service.spawn_due_after(now, cursor, self.batch_size).await?;
            total.absorb(pass.report);

            if (pass.report.examined as i64) < self.batch_size {
                break;
            }
            cursor = pass.cursor;
        }

        Ok(total)
    }

    /// Tick on the configured interval until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            interval_secs = self.interval.as_secs(),
            batch_size = self.batch_size,
            "Spawn worker started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, code = e.error_code(), "Spawn pass failed");
                    }
                }
            }
        }

        info!("Spawn worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use notify_core::entities::{Dispatch, Notification};
    use notify_core::traits::{DispatchKey, DispatchTemplate};
    use notify_core::value_objects::{EventId, UserId};
    use notify_service::fakes::FakeStore;
    use notify_service::DispatchRegistry;

    fn spawner(batch_size: i64) -> SpawnerConfig {
        SpawnerConfig {
            interval_secs: 1,
            batch_size,
            dispatch_config_path: None,
        }
    }

    /// "Job/created" renders fine; "Job/broken" has a view too long to store
    fn registry() -> DispatchRegistry {
        let mut registry = DispatchRegistry::new();
        registry
            .register(
                DispatchKey::new("Job", "created", None),
                DispatchTemplate {
                    view: Some("jobs/created".to_string()),
                    ..Default::default()
                },
            )
            .register(
                DispatchKey::new("Job", "broken", None),
                DispatchTemplate {
                    view: Some("v".repeat(Dispatch::VIEW_MAX_LEN + 1)),
                    ..Default::default()
                },
            );
        registry
    }

    fn due(store: &FakeStore, user: i64, event_id: EventId, due: DateTime<Utc>) -> Notification {
        let mut notification = Notification::new(UserId::new(user), event_id, due);
        notification.created_at = due - Duration::hours(1);
        store.insert_notification(notification)
    }

    #[tokio::test]
    async fn test_tick_drains_in_several_passes() {
        let store = FakeStore::new().with_registry(registry());
        let event = store.add_event("Job", "created");
        let t = Utc::now() - Duration::minutes(1);
        for user in 1..=5 {
            due(&store, user, event, t);
        }

        let worker = SpawnWorker::new(store.context(), &spawner(2));
        let report = worker.tick().await.unwrap();
        assert_eq!(report.examined, 5);
        assert_eq!(report.spawned, 5);
        assert_eq!(report.dispatches_created, 5);

        assert!(worker.tick().await.unwrap().is_idle());
    }

    #[tokio::test]
    async fn test_tick_stops_on_short_pass() {
        let store = FakeStore::new().with_registry(registry());
        let event = store.add_event("Job", "created");
        due(&store, 1, event, Utc::now() - Duration::minutes(1));
        due(&store, 2, event, Utc::now() + Duration::hours(1));

        let worker = SpawnWorker::new(store.context(), &spawner(10));
        let report = worker.tick().await.unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(report.spawned, 1);
    }

    #[tokio::test]
    async fn test_skipped_rows_do_not_block_later_notifications() {
        let store = FakeStore::new().with_registry(registry());
        let broken = store.add_event("Job", "broken");
        let created = store.add_event("Job", "created");
        let t = Utc::now() - Duration::minutes(10);

        // A full batch of unspawnable rows ahead of a good one
        let stuck = [due(&store, 1, broken, t), due(&store, 2, broken, t)];
        let good = due(&store, 3, created, t + Duration::minutes(1));

        let worker = SpawnWorker::new(store.context(), &spawner(2));
        let report = worker.tick().await.unwrap();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.spawned, 1);
        assert!(store.notification(good.id).is_spawned());
        assert!(stuck.iter().all(|n| !store.notification(n.id).is_spawned()));

        // The stuck rows are retried on the next sweep, which still ends
        let again = worker.tick().await.unwrap();
        assert_eq!(again.examined, 2);
        assert_eq!(again.skipped, 2);
    }

    #[tokio::test]
    async fn test_tick_ends_on_full_batch_of_skips() {
        let store = FakeStore::new().with_registry(registry());
        let t = Utc::now() - Duration::minutes(1);
        // Events that no longer exist
        due(&store, 1, EventId::new(9001), t);
        due(&store, 2, EventId::new(9002), t);

        let worker = SpawnWorker::new(store.context(), &spawner(2));
        let report = worker.tick().await.unwrap();
        assert_eq!(report.examined, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.spawned, 0);
    }
}
