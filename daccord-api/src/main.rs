//! # Daccord API Server
//!
//! Community-discovery backend: accounts, communities, memberships,
//! playlists, tracks and an activity feed behind a JSON REST API.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) STORAGE_BACKEND=memory cargo run -p daccord-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use daccord_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend, DEFAULT_LOG_FILTER},
};
use daccord_shared::{
    db::{
        migrations::run_migrations,
        pool::{create_pool, PoolConfig},
    },
    store::{MemoryStore, PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Daccord API v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let store = open_store(&config).await?;
    let bind_address = config.bind_address();

    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    tracing::info!("Listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = create_pool(PoolConfig {
                url,
                max_connections: config.storage.max_connections,
                ..Default::default()
            })
            .await
            .context("failed to connect to PostgreSQL")?;

            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
