//! In-memory implementations of the repository and lookup traits for tests
//!
//! Compiled for this crate's own tests and, behind the `test-util` feature,
//! for downstream crates.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use notify_core::entities::{Dispatch, Notification, Preferences};
use notify_core::traits::{
    DispatchRepository, DueCursor, EventDirectory, EventSummary, NotificationRepository,
    PreferencesRepository, RecipientResolver, RepoResult, SpawnOutcome,
};
use notify_core::value_objects::{
    Channel, DispatchId, EventId, NotificationId, PreferencesId, UserId,
};
use notify_core::DomainError;

use crate::registry::DispatchRegistry;
use crate::services::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    preferences: HashMap<UserId, Preferences>,
    notifications: Vec<Notification>,
    dispatches: Vec<Dispatch>,
    events: HashMap<EventId, EventSummary>,
    addresses: HashMap<(UserId, Channel), String>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared in-memory store backing every fake
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
    registry: DispatchRegistry,
    /// When set, every claim loses to a concurrent writer
    lose_claims: Arc<AtomicBool>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: DispatchRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn context(&self) -> ServiceContext {
        ServiceContextBuilder::new()
            .preferences_repo(Arc::new(self.clone()))
            .notification_repo(Arc::new(self.clone()))
            .dispatch_repo(Arc::new(self.clone()))
            .dispatch_config(Arc::new(self.registry.clone()))
            .event_directory(Arc::new(self.clone()))
            .recipient_resolver(Arc::new(self.clone()))
            .build()
            .unwrap()
    }

    pub fn lose_claims(&self) {
        self.lose_claims.store(true, Ordering::SeqCst);
    }

    pub fn add_event(&self, context_type: &str, event_type: &str) -> EventId {
        let mut state = self.state.lock().unwrap();
        let id = EventId::new(state.next_id());
        state.events.insert(
            id,
            EventSummary {
                id,
                context_type: context_type.to_string(),
                event_type: event_type.to_string(),
            },
        );
        id
    }

    pub fn add_address(&self, user_id: UserId, channel: Channel, address: &str) {
        self.state
            .lock()
            .unwrap()
            .addresses
            .insert((user_id, channel), address.to_string());
    }

    pub fn set_preferences(&self, preferences: Preferences) {
        self.state
            .lock()
            .unwrap()
            .preferences
            .insert(preferences.user_id, preferences);
    }

    /// Insert a notification as-is, assigning an id
    pub fn insert_notification(&self, mut notification: Notification) -> Notification {
        let mut state = self.state.lock().unwrap();
        notification.id = NotificationId::new(state.next_id());
        state.notifications.push(notification.clone());
        notification
    }

    /// Insert a dispatch row without going through a spawn
    pub fn insert_dispatch(&self, mut dispatch: Dispatch) -> Dispatch {
        let mut state = self.state.lock().unwrap();
        dispatch.id = DispatchId::new(state.next_id());
        state.dispatches.push(dispatch.clone());
        dispatch
    }

    pub fn notification(&self, id: NotificationId) -> Notification {
        let state = self.state.lock().unwrap();
        state
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .unwrap()
    }

    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.state.lock().unwrap().dispatches.clone()
    }
}

#[async_trait]
impl PreferencesRepository for FakeStore {
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Option<Preferences>> {
        Ok(self.state.lock().unwrap().preferences.get(&user_id).cloned())
    }

    async fn create(&self, preferences: &Preferences) -> RepoResult<Preferences> {
        let mut state = self.state.lock().unwrap();
        if state.preferences.contains_key(&preferences.user_id) {
            return Err(DomainError::PreferencesAlreadyExist(preferences.user_id));
        }
        let mut created = preferences.clone();
        created.id = PreferencesId::new(state.next_id());
        state.preferences.insert(created.user_id, created.clone());
        Ok(created)
    }

    async fn update(&self, preferences: &Preferences) -> RepoResult<Preferences> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .preferences
            .get_mut(&preferences.user_id)
            .ok_or(DomainError::PreferencesNotFound(preferences.user_id))?;
        stored.channel = preferences.channel;
        stored.frequency = preferences.frequency;
        stored.updated_at = preferences.updated_at;
        Ok(stored.clone())
    }

    async fn get_or_create(&self, user_id: UserId) -> RepoResult<Preferences> {
        if let Some(existing) = PreferencesRepository::find_by_user(self, user_id).await? {
            return Ok(existing);
        }
        PreferencesRepository::create(self, &Preferences::new(user_id)).await
    }
}

#[async_trait]
impl NotificationRepository for FakeStore {
    async fn find_by_id(&self, id: NotificationId) -> RepoResult<Option<Notification>> {
        let state = self.state.lock().unwrap();
        Ok(state.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId, limit: i64) -> RepoResult<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        let mut found: Vec<_> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.due.cmp(&a.due).then(b.id.cmp(&a.id)));
        found.truncate(limit as usize);
        Ok(found)
    }

    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create(&self, notification: &Notification) -> RepoResult<Notification> {
        notification.validate()?;
        Ok(self.insert_notification(notification.clone()))
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        after: Option<DueCursor>,
        limit: i64,
    ) -> RepoResult<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        let mut due: Vec<_> = state
            .notifications
            .iter()
            .filter(|n| n.is_due(now))
            .filter(|n| after.is_none_or(|cursor| cursor.precedes(n)))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn spawn(
        &self,
        id: NotificationId,
        spawned_at: DateTime<Utc>,
        dispatches: &[Dispatch],
    ) -> RepoResult<SpawnOutcome> {
        let mut state = self.state.lock().unwrap();
        let lose = self.lose_claims.load(Ordering::SeqCst);
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(DomainError::NotificationNotFound(id))?;

        if lose {
            notification.spawned.get_or_insert(spawned_at);
            return Ok(SpawnOutcome::AlreadySpawned);
        }
        if notification.spawned.is_some() {
            return Ok(SpawnOutcome::AlreadySpawned);
        }
        notification.spawned = Some(spawned_at);

        let mut inserted = Vec::with_capacity(dispatches.len());
        for dispatch in dispatches {
            dispatch.validate()?;
            let mut row = dispatch.clone();
            row.id = DispatchId::new(state.next_id());
            row.notification_id = id;
            inserted.push(row);
        }
        state.dispatches.extend(inserted.iter().cloned());
        Ok(SpawnOutcome::Spawned(inserted))
    }

    async fn mark_read(&self, id: NotificationId, at: DateTime<Utc>) -> RepoResult<Notification> {
        let mut state = self.state.lock().unwrap();
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(DomainError::NotificationNotFound(id))?;
        notification.read.get_or_insert(at);
        Ok(notification.clone())
    }

    async fn count_unread(&self, user_id: UserId) -> RepoResult<i64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && n.read.is_none())
            .count() as i64)
    }
}

#[async_trait]
impl DispatchRepository for FakeStore {
    async fn find_by_id(&self, id: DispatchId) -> RepoResult<Option<Dispatch>> {
        let state = self.state.lock().unwrap();
        Ok(state.dispatches.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_notification(
        &self,
        notification_id: NotificationId,
    ) -> RepoResult<Vec<Dispatch>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dispatches
            .iter()
            .filter(|d| d.notification_id == notification_id)
            .cloned()
            .collect())
    }

    async fn find_pending(&self, limit: i64) -> RepoResult<Vec<Dispatch>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .dispatches
            .iter()
            .filter(|d| d.is_pending())
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_sent(&self, id: DispatchId, at: DateTime<Utc>) -> RepoResult<Dispatch> {
        let mut state = self.state.lock().unwrap();
        let dispatch = state
            .dispatches
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DomainError::DispatchNotFound(id))?;
        dispatch.mark_sent(at);
        Ok(dispatch.clone())
    }
}

#[async_trait]
impl EventDirectory for FakeStore {
    async fn find_event(&self, id: EventId) -> RepoResult<Option<EventSummary>> {
        Ok(self.state.lock().unwrap().events.get(&id).cloned())
    }
}

#[async_trait]
impl RecipientResolver for FakeStore {
    async fn resolve(&self, user_id: UserId, channel: Channel) -> RepoResult<Option<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .addresses
            .get(&(user_id, channel))
            .cloned())
    }
}
