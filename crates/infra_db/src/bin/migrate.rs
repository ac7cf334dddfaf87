//! Campus Registry - Migration Binary
//!
//! Connects to the registry database and applies pending schema migrations.
//!
//! # Usage
//!
//! ```bash
//! REGISTRY_DATABASE_URL=postgres://... cargo run --bin registry-migrate
//! ```
//!
//! # Environment Variables
//!
//! * `REGISTRY_DATABASE_URL` - PostgreSQL connection string
//! * `REGISTRY_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `REGISTRY_LOG_LEVEL` - Log filter when `RUST_LOG` is unset (default: info)
//! * `REGISTRY_LOG_FORMAT` - `json` for JSON lines, anything else for text

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_db::{create_pool, run_migrations, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = StorageConfig::from_env().context("loading storage configuration")?;

    init_tracing(&config.log_level, config.json_logs());

    tracing::info!(max_connections = config.max_connections, "Starting registry migrations");

    let pool = create_pool(config.database_config())
        .await
        .context("connecting to the registry database")?;

    run_migrations(&pool)
        .await
        .context("applying registry migrations")?;

    pool.close().await;
    tracing::info!("Registry schema is up to date");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
///
/// # Arguments
///
/// * `log_level` - Filter used when `RUST_LOG` is not set
/// * `json` - Emit JSON lines instead of text
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}
