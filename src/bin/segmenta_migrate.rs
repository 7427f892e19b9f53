//! segmenta-migrate: apply pending schema migrations.
//!
//! ## Configuration
//! - SEGMENTA_CONFIG: path to the YAML config file (default: config.yaml)
//! - DATABASE_URL: overrides the configured storage URL
//! - RUST_LOG: log filter (default: info)

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segmenta::config::Config;
use segmenta::storage::init_storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let store = init_storage(&config.storage).await?;
    let applied = store.migrate().await?;

    if applied == 0 {
        info!("Schema already up to date");
    } else {
        info!("Applied {} migration(s)", applied);
    }

    Ok(())
}
