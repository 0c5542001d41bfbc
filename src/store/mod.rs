//! Task and category storage with pluggable backends.
//!
//! Supports:
//! - `memory`: in-process ordered maps (non-persistent, default)
//! - `remote`: PostgREST-style backend-as-a-service over HTTP
//!
//! The backend is chosen once at startup from configuration; call sites
//! only ever see the trait objects.

mod memory;
mod remote;

pub use memory::InMemoryStore;
pub use remote::RemoteStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StoreConfig;
use crate::model::{
    Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};

/// Error from a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn task_not_found(id: TaskId) -> Self {
        Self::NotFound {
            entity: "task",
            id: id.to_string(),
        }
    }

    pub fn category_not_found(id: CategoryId) -> Self {
        Self::NotFound {
            entity: "category",
            id: id.to_string(),
        }
    }
}

/// Task store capability set - implemented by all storage backends.
///
/// Listing operations return tasks newest-first (`created_at` descending).
/// The active/archived partition lives here, not in the query engine:
/// `list_active` and `list_archived` are the only places the partition
/// predicate is evaluated.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Tasks with `completed = false` and `archived = false`.
    async fn list_active(&self) -> Result<Vec<Task>, StoreError>;

    /// Tasks with `archived = true`.
    async fn list_archived(&self) -> Result<Vec<Task>, StoreError>;

    /// Get a single task by ID.
    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Create a task. The store assigns `id` and `created_at`; new tasks
    /// start uncompleted and unarchived.
    async fn create(&self, new: NewTask) -> Result<Task, StoreError>;

    /// Apply the present fields of `patch`. Fails with `NotFound` when the
    /// id is absent.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError>;

    /// Delete a task. Fails with `NotFound` when the id is absent.
    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;

    /// Apply one patch across many ids. Returns only the subset the store
    /// confirms as updated; ids that did not apply are silently dropped.
    async fn bulk_update(&self, ids: &[TaskId], patch: TaskPatch)
        -> Result<Vec<Task>, StoreError>;

    /// Delete many ids in one request. Missing ids are not an error.
    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<(), StoreError>;
}

/// Category store capability set.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by name ascending.
    async fn list_all(&self) -> Result<Vec<Category>, StoreError>;

    /// Get a single category by ID.
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Create a category. The store assigns `id`.
    async fn create(&self, new: NewCategory) -> Result<Category, StoreError>;

    /// Apply the present fields of `patch`. Fails with `NotFound` when the
    /// id is absent.
    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Category, StoreError>;

    /// Delete a category. Tasks referencing it are detached
    /// (`category_id` cleared) before the record is removed.
    async fn delete(&self, id: CategoryId) -> Result<(), StoreError>;
}

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Remote,
}

impl StoreKind {
    /// Parse from environment variable value.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Self::Memory,
            "remote" | "backend" => Self::Remote,
            _ => Self::default(),
        }
    }
}

/// Create the task and category stores for the configured backend.
///
/// Both trait objects are views onto one underlying store so that
/// cross-entity rules (category deletion detaching tasks) see the same
/// data.
pub fn create_stores(config: &StoreConfig) -> (Arc<dyn TaskStore>, Arc<dyn CategoryStore>) {
    match config {
        StoreConfig::Memory => {
            let store = InMemoryStore::new();
            (Arc::new(store.clone()), Arc::new(store))
        }
        StoreConfig::Remote { url, api_key } => {
            let store = RemoteStore::new(url, api_key);
            (Arc::new(store.clone()), Arc::new(store))
        }
    }
}
