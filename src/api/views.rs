//! Computed view endpoints: the query engine over store snapshots.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use crate::model::CategoryId;
use crate::query::{compute_view, TaskStats, TaskView, ViewMode};

use super::routes::{store_error, AppState};

/// Create view routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/:mode", get(get_view))
}

#[derive(Debug, Deserialize)]
struct ViewQuery {
    /// Category filter; absent means "all"
    category: Option<CategoryId>,
    /// Free-text search over task titles
    #[serde(default)]
    q: String,
}

async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<TaskView>, (StatusCode, String)> {
    let mode = match mode.as_str() {
        "active" => ViewMode::Active,
        "archived" => ViewMode::Archived,
        other => {
            return Err((
                StatusCode::NOT_FOUND,
                format!("unknown view mode: {}", other),
            ))
        }
    };

    // The store applies the active/archived partition; the engine filters
    // and sorts the partitioned snapshot.
    let tasks = match mode {
        ViewMode::Active => state.tasks.list_active(),
        ViewMode::Archived => state.tasks.list_archived(),
    };
    let (tasks, categories) = tokio::try_join!(tasks, state.categories.list_all())
        .map_err(store_error)?;

    Ok(Json(compute_view(
        &tasks,
        &categories,
        query.category,
        &query.q,
        mode,
    )))
}

pub(super) async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskStats>, (StatusCode, String)> {
    let tasks = state.tasks.list_active().await.map_err(store_error)?;
    Ok(Json(TaskStats::compute(&tasks, Utc::now().date_naive())))
}
