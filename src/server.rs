//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, service wiring, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::domain::random::ThreadRandom;
use crate::domain::repositories::KeyValueStore;
use crate::infrastructure::store::{MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::{AppState, StateOptions};

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store (or process-local MemoryStore fallback)
/// - Rotation, statistics and settings services
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await;

    let state = AppState::new(
        store,
        Arc::new(SystemClock),
        Arc::new(ThreadRandom),
        config.rotation_tables.clone(),
        StateOptions::from(&config),
    );

    match state.auth.key_fingerprint() {
        Ok(fingerprint) => tracing::info!("Admin key fingerprint: {}", fingerprint),
        Err(e) => tracing::warn!("Cannot fingerprint admin key: {}", e),
    }

    let app = app_router(state, config.behind_proxy, config.site_dir.as_deref());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connects the configured store.
///
/// Without Redis, or when Redis cannot be reached at startup, state lives in
/// process memory and is lost on restart.
pub async fn connect_store(config: &Config) -> Arc<dyn KeyValueStore> {
    if let Some(redis_url) = &config.redis_url {
        match RedisStore::connect(redis_url, config.key_prefix.clone()).await {
            Ok(redis) => {
                tracing::info!("Store enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using MemoryStore.", e);
                Arc::new(MemoryStore::new())
            }
        }
    } else {
        tracing::warn!("Redis not configured, using MemoryStore");
        Arc::new(MemoryStore::new())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
