//! Category management API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::model::{Category, CategoryId, CategoryPatch, NewCategory};

use super::routes::{store_error, AppState};

/// Create category routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    state
        .categories
        .list_all()
        .await
        .map(Json)
        .map_err(store_error)
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, (StatusCode, String)> {
    state
        .categories
        .get(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("category {} not found", id)))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    let category = state.categories.create(new).await.map_err(store_error)?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, (StatusCode, String)> {
    state
        .categories
        .update(id, patch)
        .await
        .map(Json)
        .map_err(store_error)
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.categories.delete(id).await.map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::router;
    use crate::config::{Config, StoreConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        let config = Config::new("127.0.0.1".to_string(), 0, StoreConfig::Memory);
        router(Arc::new(AppState::new(config)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn category_crud_roundtrip() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/categories",
                json!({"name": "Work", "color": "#5B21B6", "icon": "Briefcase"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/categories/{}", id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"name": "Office"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["name"], "Office");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/categories/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/categories/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_a_category_detaches_its_tasks() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json("/api/categories", json!({"name": "Errands"})))
            .await
            .unwrap();
        let category_id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/tasks",
                json!({"title": "mail package", "category_id": category_id}),
            ))
            .await
            .unwrap();
        let task_id = body_json(response).await["id"].as_str().unwrap().to_string();

        app.clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/categories/{}", category_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/tasks/{}", task_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let task = body_json(response).await;
        assert!(task.get("category_id").is_none() || task["category_id"].is_null());
    }
}
