//! Task management API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::bulk::{complete_selected, delete_selected, Selection};
use crate::model::{CategoryId, NewTask, Priority, Task, TaskId, TaskPatch};

use super::routes::{store_error, AppState};

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_task))
        .route("/active", get(list_active))
        .route("/archived", get(list_archived))
        .route(
            "/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/:id/archive", post(archive_task))
        .route("/:id/restore", post(restore_task))
        .route("/bulk/complete", post(bulk_complete))
        .route("/bulk/delete", post(bulk_delete))
        .route("/archive/clear", post(clear_archive))
}

#[derive(Debug, Deserialize)]
struct CreateTaskRequest {
    /// Task title; must be non-empty after trimming
    title: String,
    category_id: Option<CategoryId>,
    #[serde(default)]
    priority: Priority,
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct BulkRequest {
    ids: Vec<TaskId>,
}

async fn list_active(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    state
        .tasks
        .list_active()
        .await
        .map(Json)
        .map_err(store_error)
}

async fn list_archived(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    state
        .tasks
        .list_archived()
        .await
        .map(Json)
        .map_err(store_error)
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, (StatusCode, String)> {
    state
        .tasks
        .get(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("task {} not found", id)))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, String)> {
    // Validation happens here, before the store is involved at all.
    let mut new = NewTask::new(&req.title)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    new.category_id = req.category_id;
    new.priority = req.priority;
    new.due_date = req.due_date;

    let task = state.tasks.create(new).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, (StatusCode, String)> {
    state
        .tasks
        .update(id, patch)
        .await
        .map(Json)
        .map_err(store_error)
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.tasks.delete(id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn archive_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, (StatusCode, String)> {
    state
        .tasks
        .update(id, TaskPatch::archive())
        .await
        .map(Json)
        .map_err(store_error)
}

async fn restore_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, (StatusCode, String)> {
    state
        .tasks
        .update(id, TaskPatch::restore())
        .await
        .map(Json)
        .map_err(store_error)
}

async fn bulk_complete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    let mut selection = Selection::from_ids(req.ids);
    complete_selected(state.tasks.as_ref(), &mut selection)
        .await
        .map(Json)
        .map_err(store_error)
}

async fn bulk_delete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BulkRequest>,
) -> Result<Json<Vec<TaskId>>, (StatusCode, String)> {
    let mut selection = Selection::from_ids(req.ids);
    delete_selected(state.tasks.as_ref(), &mut selection)
        .await
        .map(Json)
        .map_err(store_error)
}

async fn clear_archive(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskId>>, (StatusCode, String)> {
    let archived = state.tasks.list_archived().await.map_err(store_error)?;
    let ids: Vec<TaskId> = archived.iter().map(|task| task.id).collect();
    let mut selection = Selection::from_ids(ids);
    delete_selected(state.tasks.as_ref(), &mut selection)
        .await
        .map(Json)
        .map_err(store_error)
}
