//! # notify-worker
//!
//! Wires the PostgreSQL repositories into the services and runs the spawn
//! loop until interrupted.

pub mod worker;

pub use worker::SpawnWorker;

use std::sync::Arc;

use notify_common::{AppConfig, AppError};
use notify_db::{create_pool, initialize_schema, notification_schema, DatabaseConfig, SchemaConfig};
use notify_service::{DispatchRegistry, ServiceContext};
use tracing::info;

/// Load the dispatch registry from the configured mapping file, if any
pub fn load_registry(path: Option<&str>) -> Result<DispatchRegistry, AppError> {
    let Some(path) = path else {
        info!("No dispatch mapping file configured; notifications will spawn without dispatches");
        return Ok(DispatchRegistry::new());
    };

    let registry = DispatchRegistry::load(path)?;
    info!(path, keys = registry.len(), "Dispatch mappings loaded");
    Ok(registry)
}

/// Connect, optionally create the schema, and build the service context
pub async fn create_service_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if config.schema.auto_create {
        let tables = notification_schema(&SchemaConfig::from(&config.schema))
            .map_err(|e| AppError::Schema(e.to_string()))?;
        initialize_schema(&pool, &tables)
            .await
            .map_err(|e| AppError::Schema(e.to_string()))?;
        info!(tables = tables.len(), "Notification schema ready");
    }

    let registry = load_registry(config.spawner.dispatch_config_path.as_deref())?;
    Ok(ServiceContext::postgres(pool, &config.schema, Arc::new(registry))?)
}

/// Run the worker until Ctrl-C
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let ctx = create_service_context(&config).await?;
    let worker = SpawnWorker::new(ctx, &config.spawner);
    worker.run_until(shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
