//! Notification lifecycle integration tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test lifecycle_tests

use chrono::{Duration, Utc};
use integration_tests::{check_test_env, notify_later, notify_now, unique_email, TestEnv};
use notify_core::entities::Notification;
use notify_core::value_objects::{Channel, Frequency};
use notify_service::dto::UpdatePreferencesRequest;
use notify_service::{DispatchService, NotificationService, PreferencesService, ServiceError};

// ============================================================================
// Spawn Tests
// ============================================================================

#[tokio::test]
async fn test_notification_spawns_and_sends() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let email = unique_email();
    let user = env.seed_user(&email, None).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    let notifications = NotificationService::new(&env.ctx);
    let created = notifications
        .notify(notify_now(user, event, Some("customer")))
        .await
        .unwrap();

    env.worker().tick().await.unwrap();

    let dispatch_service = DispatchService::new(&env.ctx);
    let dispatches = dispatch_service.for_notification(created.id).await.unwrap();
    assert_eq!(dispatches.len(), 1);
    let dispatch = &dispatches[0];
    assert_eq!(dispatch.channel, Channel::Email);
    assert_eq!(dispatch.view.as_deref(), Some("jobs/created"));
    assert_eq!(dispatch.batch_spec.as_deref(), Some("jobs/digest"));
    assert_eq!(dispatch.to_address.as_deref(), Some(email.as_str()));
    assert!(dispatch.sent.is_none());

    // Sent twice: the first time sticks
    let t2 = Utc::now() + Duration::seconds(1);
    let first = dispatch_service.mark_sent_at(dispatch.id, t2).await.unwrap();
    let second = dispatch_service
        .mark_sent_at(dispatch.id, t2 + Duration::seconds(5))
        .await
        .unwrap();
    assert_eq!(first.sent, second.sent);
}

#[tokio::test]
async fn test_future_notification_is_not_spawned() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let user = env.seed_user(&unique_email(), None).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    let created = NotificationService::new(&env.ctx)
        .notify(notify_later(user, event, 3600))
        .await
        .unwrap();

    env.worker().tick().await.unwrap();

    let stored = env
        .ctx
        .notification_repo()
        .find_by_id(created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.spawned.is_none());
}

#[tokio::test]
async fn test_read_before_due_sends_nothing() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let user = env.seed_user(&unique_email(), None).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    // Read a second before it fell due
    let now = Utc::now();
    let mut notification = Notification::new(user, event, now);
    notification.created_at = now - Duration::hours(1);
    notification.read = Some(now - Duration::seconds(1));
    let created = env
        .ctx
        .notification_repo()
        .create(&notification)
        .await
        .unwrap();

    env.worker().tick().await.unwrap();

    let stored = env
        .ctx
        .notification_repo()
        .find_by_id(created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.spawned.is_some());
    assert!(DispatchService::new(&env.ctx)
        .for_notification(created.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_disabled_user_gets_no_dispatches() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let user = env.seed_user(&unique_email(), None).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    let prefs = PreferencesService::new(&env.ctx)
        .update_preferences(
            user,
            UpdatePreferencesRequest {
                channel: None,
                frequency: Some("never".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(prefs.frequency, Frequency::Never);
    assert!(!prefs.enabled);

    let created = NotificationService::new(&env.ctx)
        .notify(notify_now(user, event, None))
        .await
        .unwrap();
    env.worker().tick().await.unwrap();

    assert!(DispatchService::new(&env.ctx)
        .for_notification(created.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_vendor_on_sms_gets_sms_template_only() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let user = env.seed_user(&unique_email(), Some("+15550100")).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    PreferencesService::new(&env.ctx)
        .update_preferences(
            user,
            UpdatePreferencesRequest {
                channel: Some("sms".to_string()),
                frequency: None,
            },
        )
        .await
        .unwrap();

    let created = NotificationService::new(&env.ctx)
        .notify(notify_now(user, event, Some("vendor")))
        .await
        .unwrap();
    env.worker().tick().await.unwrap();

    let dispatches = DispatchService::new(&env.ctx)
        .for_notification(created.id)
        .await
        .unwrap();
    assert_eq!(dispatches.len(), 1);
    assert_eq!(dispatches[0].channel, Channel::Sms);
    assert_eq!(dispatches[0].view.as_deref(), Some("jobs/vendor_sms"));
}

#[tokio::test]
async fn test_concurrent_spawners_create_dispatches_once() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let event = env.seed_event("Job", "created").await.unwrap();

    let notifications = NotificationService::new(&env.ctx);
    let mut ids = Vec::new();
    for _ in 0..5 {
        let user = env.seed_user(&unique_email(), None).await.unwrap();
        ids.push(
            notifications
                .notify(notify_now(user, event, None))
                .await
                .unwrap()
                .id,
        );
    }

    let a = env.worker();
    let b = env.worker();
    let (ra, rb) = tokio::join!(a.tick(), b.tick());
    ra.unwrap();
    rb.unwrap();

    let dispatch_service = DispatchService::new(&env.ctx);
    for id in ids {
        let dispatches = dispatch_service.for_notification(id).await.unwrap();
        assert_eq!(dispatches.len(), 1, "notification {id} spawned more than once");
    }
}

// ============================================================================
// Dispatch Rule Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_dispatch_is_not_found() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let err = DispatchService::new(&env.ctx)
        .mark_sent(notify_core::DispatchId::new(i64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn test_unread_count_tracks_reads() {
    if !check_test_env() {
        return;
    }

    let env = TestEnv::start().await.expect("Failed to start test env");
    let user = env.seed_user(&unique_email(), None).await.unwrap();
    let event = env.seed_event("Job", "created").await.unwrap();

    let notifications = NotificationService::new(&env.ctx);
    let first = notifications
        .notify(notify_now(user, event, None))
        .await
        .unwrap();
    notifications
        .notify(notify_now(user, event, None))
        .await
        .unwrap();
    assert_eq!(notifications.unread_count(user).await.unwrap(), 2);

    notifications.mark_read(first.id).await.unwrap();
    assert_eq!(notifications.unread_count(user).await.unwrap(), 1);

    let listed = notifications.list_for_user(user, None).await.unwrap();
    assert_eq!(listed.len(), 2);
}
