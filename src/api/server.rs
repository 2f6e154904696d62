use anyhow::Context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::api::auth;
use crate::config::{AppConfig, Backend};
use crate::db::{CredentialStore, MemoryStore, SqliteStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
}

/// Builds the configured store, creates its schema and inserts the seed
/// record if its username is not present yet.
pub async fn bootstrap(config: &AppConfig) -> anyhow::Result<Arc<dyn CredentialStore>> {
    let store: Arc<dyn CredentialStore> = match config.storage.backend {
        Backend::Sqlite => {
            let store = SqliteStore::connect(&config.storage.database_url)
                .await
                .with_context(|| {
                    format!("failed to open database {}", config.storage.database_url)
                })?;
            store.init().await.context("failed to create schema")?;
            Arc::new(store)
        }
        Backend::Memory => Arc::new(MemoryStore::new()),
    };

    let seeded = store
        .seed_user(&config.seed.to_new_user())
        .await
        .context("failed to seed sample user")?;
    if seeded {
        tracing::info!(username = %config.seed.username, "seed user created");
    } else {
        tracing::info!(username = %config.seed.username, "seed user already present");
    }

    Ok(store)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(auth::login_form))
        .route("/login", post(auth::login))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.count_users().await {
        Ok(users) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "users": users })),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = ?err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}

pub async fn start_server(config: AppConfig) -> anyhow::Result<()> {
    let store = bootstrap(&config).await?;
    let state = Arc::new(AppState { store });
    let app = router(state);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(backend = ?config.storage.backend, "server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
