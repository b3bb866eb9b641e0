//! Process bootstrap: configuration, connections and wiring

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use invoicer::bus::{BusListener, Dispatcher};
use invoicer::config::{AppEnv, Config};
use invoicer::core::service::InvoiceService;
use invoicer::storage::{PostgresInvoiceStore, postgres};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(env = %config.env, "Starting invoicer");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to PostgreSQL");

    if config.env == AppEnv::Development {
        postgres::ensure_schema(&pool)
            .await
            .context("Failed to apply schema")?;
        info!("Schema applied");
    }

    let client = async_nats::connect(&config.nats_url)
        .await
        .context("Failed to connect to NATS")?;
    info!(url = %config.nats_url, "Connected to NATS");

    let store = Arc::new(PostgresInvoiceStore::new(pool));
    let service = Arc::new(InvoiceService::new(store));
    let dispatcher = Arc::new(Dispatcher::new(service));

    BusListener::new(client.clone(), dispatcher).run().await?;

    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");

    client
        .drain()
        .await
        .context("Failed to drain NATS connection")?;

    Ok(())
}
