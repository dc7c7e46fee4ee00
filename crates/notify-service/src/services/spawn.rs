//! Spawn service
//!
//! Turns due notifications into dispatches. Each notification is claimed
//! with a conditional update inside the same transaction that inserts its
//! dispatches, so concurrent spawners never duplicate work.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use notify_core::entities::{Dispatch, Notification, Preferences};
use notify_core::traits::{DispatchKey, DueCursor, EventSummary, SpawnOutcome};

use crate::dto::SpawnReport;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// What happened to a single due notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Spawned { dispatches: usize },
    Suppressed,
    AlreadySpawned,
    Skipped,
}

/// Outcome of one pass over the due queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnPass {
    pub report: SpawnReport,
    /// Position of the last row examined, or the starting position when the
    /// pass found nothing
    pub cursor: Option<DueCursor>,
}

/// Spawn service
pub struct SpawnService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SpawnService<'a> {
    /// Create a new SpawnService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Spawn up to `limit` notifications due at `now`, oldest due first
    #[instrument(skip(self))]
    pub async fn spawn_due(&self, now: DateTime<Utc>, limit: i64) -> ServiceResult<SpawnReport> {
        Ok(self.spawn_due_after(now, None, limit).await?.report)
    }

    /// Spawn up to `limit` due notifications that sort after `after`
    ///
    /// Notifications whose event cannot be found or whose dispatches fail
    /// validation are left unclaimed and counted as skipped. They stay due,
    /// so a sweep resumes from the returned cursor to reach the rows behind
    /// them. Repository failures abort the pass.
    #[instrument(skip(self))]
    pub async fn spawn_due_after(
        &self,
        now: DateTime<Utc>,
        after: Option<DueCursor>,
        limit: i64,
    ) -> ServiceResult<SpawnPass> {
        let due = self
            .ctx
            .notification_repo()
            .find_due(now, after, limit.max(1))
            .await?;
        let cursor = due.last().map(DueCursor::from).or(after);

        let mut report = SpawnReport {
            examined: due.len(),
            ..SpawnReport::default()
        };

        for notification in due {
            let id = notification.id;
            let step = match self.spawn_one(notification, now).await {
                Ok(step) => step,
                Err(ServiceError::Domain(e)) if e.is_validation() => {
                    warn!(notification_id = %id, error = %e, "Notification cannot be spawned");
                    Step::Skipped
                }
                Err(e) => return Err(e),
            };

            match step {
                Step::Spawned { dispatches } => {
                    report.spawned += 1;
                    report.dispatches_created += dispatches;
                }
                Step::Suppressed => {
                    report.spawned += 1;
                    report.suppressed += 1;
                }
                Step::AlreadySpawned => report.already_spawned += 1,
                Step::Skipped => report.skipped += 1,
            }
        }

        if !report.is_idle() {
            info!(
                examined = report.examined,
                spawned = report.spawned,
                suppressed = report.suppressed,
                already_spawned = report.already_spawned,
                skipped = report.skipped,
                dispatches = report.dispatches_created,
                "Spawn pass finished"
            );
        }
        Ok(SpawnPass { report, cursor })
    }

    async fn spawn_one(&self, mut notification: Notification, now: DateTime<Utc>) -> ServiceResult<Step> {
        let prefs = self.effective_preferences(&notification).await?;

        // Read before spawning (which covers read before due) or opted out
        let suppress = prefs.is_disabled() || !notification.should_dispatch();

        // Rejects a spawn time before creation
        notification.mark_spawned(now)?;

        let dispatches = if suppress {
            Vec::new()
        } else {
            let Some(event) = self
                .ctx
                .event_directory()
                .find_event(notification.event_id)
                .await?
            else {
                warn!(
                    notification_id = %notification.id,
                    event_id = %notification.event_id,
                    "Event not found, leaving notification unspawned"
                );
                return Ok(Step::Skipped);
            };
            self.plan_dispatches(&notification, &prefs, &event).await?
        };

        let outcome = self
            .ctx
            .notification_repo()
            .spawn(notification.id, now, &dispatches)
            .await?;

        Ok(match outcome {
            SpawnOutcome::AlreadySpawned => {
                debug!(notification_id = %notification.id, "Notification claimed by another spawner");
                Step::AlreadySpawned
            }
            SpawnOutcome::Spawned(_) if suppress => {
                debug!(notification_id = %notification.id, "Notification suppressed");
                Step::Suppressed
            }
            SpawnOutcome::Spawned(inserted) => {
                debug!(
                    notification_id = %notification.id,
                    dispatches = inserted.len(),
                    "Notification spawned"
                );
                Step::Spawned {
                    dispatches: inserted.len(),
                }
            }
        })
    }

    /// Stored preferences, or the defaults when the user never set any
    async fn effective_preferences(&self, notification: &Notification) -> ServiceResult<Preferences> {
        Ok(self
            .ctx
            .preferences_repo()
            .find_by_user(notification.user_id)
            .await?
            .unwrap_or_else(|| Preferences::new(notification.user_id)))
    }

    /// One dispatch per template that applies to the user's channel
    async fn plan_dispatches(
        &self,
        notification: &Notification,
        prefs: &Preferences,
        event: &EventSummary,
    ) -> ServiceResult<Vec<Dispatch>> {
        let key = DispatchKey::new(
            event.context_type.as_str(),
            event.event_type.as_str(),
            notification.role.clone(),
        );
        let templates: Vec<_> = self
            .ctx
            .dispatch_config()
            .lookup(&key)
            .into_iter()
            .filter(|t| t.applies_to(prefs.channel))
            .collect();

        if templates.is_empty() {
            debug!(
                context_type = %key.context_type,
                event_type = %key.event_type,
                role = ?key.role,
                "No dispatch configuration"
            );
            return Ok(Vec::new());
        }

        let to_address = self
            .ctx
            .recipient_resolver()
            .resolve(notification.user_id, prefs.channel)
            .await?;
        if to_address.is_none() {
            warn!(
                user_id = %notification.user_id,
                channel = prefs.channel.as_str(),
                "No address for recipient"
            );
        }

        let dispatches: Vec<_> = templates
            .into_iter()
            .map(|t| {
                Dispatch::new(notification.id, prefs.channel)
                    .with_view(t.view)
                    .with_spec(t.spec)
                    .with_batch_spec(t.batch_spec)
                    .with_to_address(to_address.clone())
                    .with_bcc_address(t.bcc_address)
            })
            .collect();

        for dispatch in &dispatches {
            dispatch.validate()?;
        }
        Ok(dispatches)
    }
}
