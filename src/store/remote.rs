//! Remote backend-as-a-service store.
//!
//! Talks to a PostgREST-style REST layer: one route per table, filters in
//! the query string, `Prefer: return=representation` to read back affected
//! rows. The transport is an implementation detail of this module; callers
//! only see the store traits.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CategoryStore, StoreError, TaskStore};
use crate::model::{
    Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    url: String,
    api_key: String,
}

impl RemoteStore {
    /// Create a client for the backend at `url` authenticated with `api_key`.
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the JSON row set from the response.
    async fn rows<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let resp = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("backend request failed: {} - {}", status, text);
            return Err(StoreError::Unavailable(format!("{}: {}", status, text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| StoreError::Unavailable(format!("invalid backend response: {}", e)))
    }

    /// Send a request where only success matters.
    async fn execute(&self, builder: RequestBuilder) -> Result<(), StoreError> {
        let resp = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!("backend request failed: {} - {}", status, text);
            return Err(StoreError::Unavailable(format!("{}: {}", status, text)));
        }
        Ok(())
    }

    fn representation(builder: RequestBuilder) -> RequestBuilder {
        builder.header("Prefer", "return=representation")
    }
}

/// Build an `id=in.(...)` filter value for a bulk request.
fn id_in_filter(ids: &[TaskId]) -> String {
    let joined: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("in.({})", joined.join(","))
}

// ==================== Tasks ====================

#[async_trait]
impl TaskStore for RemoteStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn list_active(&self) -> Result<Vec<Task>, StoreError> {
        self.rows(self.client.get(format!(
            "{}?completed=eq.false&archived=eq.false&order=created_at.desc",
            self.rest_url("tasks")
        )))
        .await
    }

    async fn list_archived(&self) -> Result<Vec<Task>, StoreError> {
        self.rows(self.client.get(format!(
            "{}?archived=eq.true&order=created_at.desc",
            self.rest_url("tasks")
        )))
        .await
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let rows: Vec<Task> = self
            .rows(
                self.client
                    .get(format!("{}?id=eq.{}", self.rest_url("tasks"), id)),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        let rows: Vec<Task> = self
            .rows(Self::representation(
                self.client.post(self.rest_url("tasks")).json(&new),
            ))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Unavailable("no task returned".to_string()))
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let rows: Vec<Task> = self
            .rows(Self::representation(
                self.client
                    .patch(format!("{}?id=eq.{}", self.rest_url("tasks"), id))
                    .json(&patch),
            ))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let rows: Vec<Task> = self
            .rows(Self::representation(
                self.client
                    .delete(format!("{}?id=eq.{}", self.rest_url("tasks"), id)),
            ))
            .await?;
        if rows.is_empty() {
            return Err(StoreError::task_not_found(id));
        }
        Ok(())
    }

    async fn bulk_update(
        &self,
        ids: &[TaskId],
        patch: TaskPatch,
    ) -> Result<Vec<Task>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        // The backend returns only the rows it actually updated; ids it
        // dropped simply do not appear in the representation.
        self.rows(Self::representation(
            self.client
                .patch(format!("{}?id={}", self.rest_url("tasks"), id_in_filter(ids)))
                .json(&patch),
        ))
        .await
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.execute(
            self.client
                .delete(format!("{}?id={}", self.rest_url("tasks"), id_in_filter(ids))),
        )
        .await
    }
}

// ==================== Categories ====================

#[async_trait]
impl CategoryStore for RemoteStore {
    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        self.rows(
            self.client
                .get(format!("{}?order=name.asc", self.rest_url("categories"))),
        )
        .await
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let rows: Vec<Category> = self
            .rows(
                self.client
                    .get(format!("{}?id=eq.{}", self.rest_url("categories"), id)),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, StoreError> {
        let rows: Vec<Category> = self
            .rows(Self::representation(
                self.client.post(self.rest_url("categories")).json(&new),
            ))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Unavailable("no category returned".to_string()))
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Category, StoreError> {
        let rows: Vec<Category> = self
            .rows(Self::representation(
                self.client
                    .patch(format!("{}?id=eq.{}", self.rest_url("categories"), id))
                    .json(&patch),
            ))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::category_not_found(id))
    }

    async fn delete(&self, id: CategoryId) -> Result<(), StoreError> {
        // Detach referencing tasks first so the category id does not dangle.
        self.execute(
            self.client
                .patch(format!("{}?category_id=eq.{}", self.rest_url("tasks"), id))
                .json(&DetachCategory { category_id: None }),
        )
        .await?;

        let rows: Vec<Category> = self
            .rows(Self::representation(
                self.client
                    .delete(format!("{}?id=eq.{}", self.rest_url("categories"), id)),
            ))
            .await?;
        if rows.is_empty() {
            return Err(StoreError::category_not_found(id));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct DetachCategory {
    category_id: Option<CategoryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_in_filter_joins_ids() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_eq!(id_in_filter(&[a, b]), format!("in.({},{})", a, b));
    }

    #[test]
    fn base_url_is_normalized() {
        let store = RemoteStore::new("https://backend.example.com/", "key");
        assert_eq!(
            store.rest_url("tasks"),
            "https://backend.example.com/rest/v1/tasks"
        );
    }
}
