//! Notification worker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p notify-worker
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use notify_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        interval_secs = config.spawner.interval_secs,
        batch_size = config.spawner.batch_size,
        "Configuration loaded"
    );

    if let Err(e) = notify_worker::run(config).await {
        error!(error = %e, code = e.error_code(), "Worker failed");
        std::process::exit(1);
    }
}
