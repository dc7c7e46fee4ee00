//! Service context - dependency container for services
//!
//! Holds the repositories, spawn-time lookups, and external directories
//! needed by services.

use std::sync::Arc;

use notify_common::{AppError, SchemaSettings};
use notify_core::traits::{
    DispatchConfigLookup, DispatchRepository, EventDirectory, NotificationRepository,
    PreferencesRepository, RecipientResolver,
};
use notify_db::{
    PgDispatchRepository, PgEventDirectory, PgNotificationRepository, PgPool,
    PgPreferencesRepository, PgRecipientResolver,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Services borrow the context; it is cheap to clone and share across tasks.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    preferences_repo: Arc<dyn PreferencesRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    dispatch_repo: Arc<dyn DispatchRepository>,

    // Spawn-time lookups
    dispatch_config: Arc<dyn DispatchConfigLookup>,
    event_directory: Arc<dyn EventDirectory>,
    recipient_resolver: Arc<dyn RecipientResolver>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        preferences_repo: Arc<dyn PreferencesRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        dispatch_repo: Arc<dyn DispatchRepository>,
        dispatch_config: Arc<dyn DispatchConfigLookup>,
        event_directory: Arc<dyn EventDirectory>,
        recipient_resolver: Arc<dyn RecipientResolver>,
    ) -> Self {
        Self {
            preferences_repo,
            notification_repo,
            dispatch_repo,
            dispatch_config,
            event_directory,
            recipient_resolver,
        }
    }

    /// Wire the PostgreSQL implementations over a shared pool
    ///
    /// # Errors
    /// Returns `AppError::Schema` if a configured table or column name is not
    /// a valid identifier.
    pub fn postgres(
        pool: PgPool,
        settings: &SchemaSettings,
        dispatch_config: Arc<dyn DispatchConfigLookup>,
    ) -> ServiceResult<Self> {
        let event_directory = PgEventDirectory::from_settings(pool.clone(), settings)
            .map_err(|e| AppError::Schema(e.to_string()))?;
        let recipient_resolver = PgRecipientResolver::from_settings(pool.clone(), settings)
            .map_err(|e| AppError::Schema(e.to_string()))?;

        Ok(Self::new(
            Arc::new(PgPreferencesRepository::new(pool.clone())),
            Arc::new(PgNotificationRepository::new(pool.clone())),
            Arc::new(PgDispatchRepository::new(pool)),
            dispatch_config,
            Arc::new(event_directory),
            Arc::new(recipient_resolver),
        ))
    }

    // === Repositories ===

    /// Get the preferences repository
    pub fn preferences_repo(&self) -> &dyn PreferencesRepository {
        self.preferences_repo.as_ref()
    }

    /// Get the notification repository
    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    /// Get the dispatch repository
    pub fn dispatch_repo(&self) -> &dyn DispatchRepository {
        self.dispatch_repo.as_ref()
    }

    // === Lookups ===

    /// Get the dispatch configuration consulted at spawn time
    pub fn dispatch_config(&self) -> &dyn DispatchConfigLookup {
        self.dispatch_config.as_ref()
    }

    /// Get the event directory
    pub fn event_directory(&self) -> &dyn EventDirectory {
        self.event_directory.as_ref()
    }

    /// Get the recipient resolver
    pub fn recipient_resolver(&self) -> &dyn RecipientResolver {
        self.recipient_resolver.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("lookups", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom dependencies
#[derive(Default)]
pub struct ServiceContextBuilder {
    preferences_repo: Option<Arc<dyn PreferencesRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    dispatch_repo: Option<Arc<dyn DispatchRepository>>,
    dispatch_config: Option<Arc<dyn DispatchConfigLookup>>,
    event_directory: Option<Arc<dyn EventDirectory>>,
    recipient_resolver: Option<Arc<dyn RecipientResolver>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preferences_repo(mut self, repo: Arc<dyn PreferencesRepository>) -> Self {
        self.preferences_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn dispatch_repo(mut self, repo: Arc<dyn DispatchRepository>) -> Self {
        self.dispatch_repo = Some(repo);
        self
    }

    pub fn dispatch_config(mut self, lookup: Arc<dyn DispatchConfigLookup>) -> Self {
        self.dispatch_config = Some(lookup);
        self
    }

    pub fn event_directory(mut self, directory: Arc<dyn EventDirectory>) -> Self {
        self.event_directory = Some(directory);
        self
    }

    pub fn recipient_resolver(mut self, resolver: Arc<dyn RecipientResolver>) -> Self {
        self.recipient_resolver = Some(resolver);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.preferences_repo
                .ok_or_else(|| ServiceError::validation("preferences_repo is required"))?,
            self.notification_repo
                .ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            self.dispatch_repo
                .ok_or_else(|| ServiceError::validation("dispatch_repo is required"))?,
            self.dispatch_config
                .ok_or_else(|| ServiceError::validation("dispatch_config is required"))?,
            self.event_directory
                .ok_or_else(|| ServiceError::validation("event_directory is required"))?,
            self.recipient_resolver
                .ok_or_else(|| ServiceError::validation("recipient_resolver is required"))?,
        ))
    }
}
