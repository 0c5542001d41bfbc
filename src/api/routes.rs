//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::{create_stores, CategoryStore, StoreError, StoreKind, TaskStore};

use super::{categories, tasks, views};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tasks: Arc<dyn TaskStore>,
    pub categories: Arc<dyn CategoryStore>,
}

impl AppState {
    /// Build state for the configured store backend.
    pub fn new(config: Config) -> Self {
        let (tasks, categories) = create_stores(&config.store);
        Self {
            config,
            tasks,
            categories,
        }
    }
}

/// Map a store error to an HTTP response.
pub(super) fn store_error(err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        StoreError::Unavailable(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

/// Build the application router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(views::stats))
        .nest("/api/views", views::routes())
        .nest("/api/tasks", tasks::routes())
        .nest("/api/categories", categories::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    store: String,
    persistent: bool,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = match state.config.store.kind() {
        StoreKind::Memory => "memory",
        StoreKind::Remote => "remote",
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        persistent: state.tasks.is_persistent(),
    })
}
