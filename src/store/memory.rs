//! In-memory store (non-persistent).
//!
//! Backs the same capability set as the remote store with two ordered maps
//! behind async locks. Used as the default backend and throughout the test
//! suite.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{CategoryStore, StoreError, TaskStore};
use crate::model::{
    Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tasks: Arc<RwLock<BTreeMap<TaskId, Task>>>,
    categories: Arc<RwLock<BTreeMap<CategoryId, Category>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list_tasks_where(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| keep(task))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn list_active(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.list_tasks_where(Task::is_active).await)
    }

    async fn list_archived(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.list_tasks_where(|task| task.archived).await)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        let task = Task {
            id: TaskId::new(),
            title: new.title().to_string(),
            completed: false,
            category_id: new.category_id,
            priority: new.priority,
            due_date: new.due_date,
            created_at: Utc::now(),
            archived: false,
        };
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::task_not_found(id))?;
        patch.apply(task);
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.tasks
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::task_not_found(id))
    }

    async fn bulk_update(
        &self,
        ids: &[TaskId],
        patch: TaskPatch,
    ) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        let mut updated = Vec::new();
        for id in ids {
            if let Some(task) = tasks.get_mut(id) {
                patch.apply(task);
                updated.push(task.clone());
            }
        }
        Ok(updated)
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        for id in ids {
            tasks.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> =
            self.categories.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, StoreError> {
        let category = Category {
            id: CategoryId::new(),
            name: new.name,
            color: new.color,
            icon: new.icon,
        };
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Category, StoreError> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .ok_or_else(|| StoreError::category_not_found(id))?;
        patch.apply(category);
        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), StoreError> {
        let removed = self.categories.write().await.remove(&id);
        if removed.is_none() {
            return Err(StoreError::category_not_found(id));
        }
        // Detach referencing tasks so the category id does not dangle.
        let mut tasks = self.tasks.write().await;
        for task in tasks.values_mut() {
            if task.category_id == Some(id) {
                task.category_id = None;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let store = InMemoryStore::new();
        let task = TaskStore::create(&store, NewTask::new("write changelog").unwrap())
            .await
            .unwrap();

        assert_eq!(task.title, "write changelog");
        assert!(!task.completed);
        assert!(!task.archived);
        assert_eq!(task.priority, Priority::Medium);

        let fetched = TaskStore::get(&store, task.id).await.unwrap();
        assert_eq!(fetched, Some(task));
    }

    #[tokio::test]
    async fn listings_respect_the_partition() {
        let store = InMemoryStore::new();
        let active = TaskStore::create(&store, NewTask::new("active").unwrap())
            .await
            .unwrap();
        let done = TaskStore::create(&store, NewTask::new("done").unwrap())
            .await
            .unwrap();
        let archived = TaskStore::create(&store, NewTask::new("archived").unwrap())
            .await
            .unwrap();

        TaskStore::update(&store, done.id, TaskPatch::complete())
            .await
            .unwrap();
        TaskStore::update(&store, archived.id, TaskPatch::archive())
            .await
            .unwrap();

        let active_list = store.list_active().await.unwrap();
        assert_eq!(active_list.len(), 1);
        assert_eq!(active_list[0].id, active.id);

        // Completed-but-unarchived tasks belong to neither listing.
        let archived_list = store.list_archived().await.unwrap();
        assert_eq!(archived_list.len(), 1);
        assert_eq!(archived_list[0].id, archived.id);
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let store = InMemoryStore::new();
        let err = TaskStore::update(&store, TaskId::new(), TaskPatch::complete())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "task", .. }));
    }

    #[tokio::test]
    async fn delete_missing_task_is_not_found() {
        let store = InMemoryStore::new();
        let err = TaskStore::delete(&store, TaskId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "task", .. }));
    }

    #[tokio::test]
    async fn bulk_update_confirms_only_existing_ids() {
        let store = InMemoryStore::new();
        let task = TaskStore::create(&store, NewTask::new("real").unwrap())
            .await
            .unwrap();

        let updated = store
            .bulk_update(&[task.id, TaskId::new()], TaskPatch::complete())
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, task.id);
        assert!(updated[0].completed);
    }

    #[tokio::test]
    async fn bulk_delete_tolerates_missing_ids() {
        let store = InMemoryStore::new();
        let task = TaskStore::create(&store, NewTask::new("gone").unwrap())
            .await
            .unwrap();

        store
            .bulk_delete(&[task.id, TaskId::new()])
            .await
            .unwrap();

        assert_eq!(TaskStore::get(&store, task.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn categories_list_by_name() {
        let store = InMemoryStore::new();
        for name in ["Work", "Errands", "Personal"] {
            CategoryStore::create(
                &store,
                NewCategory {
                    name: name.to_string(),
                    color: String::new(),
                    icon: String::new(),
                },
            )
            .await
            .unwrap();
        }

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Errands", "Personal", "Work"]);
    }

    #[tokio::test]
    async fn category_delete_detaches_tasks() {
        let store = InMemoryStore::new();
        let category = CategoryStore::create(
            &store,
            NewCategory {
                name: "Work".to_string(),
                color: String::new(),
                icon: String::new(),
            },
        )
        .await
        .unwrap();

        let mut new = NewTask::new("with category").unwrap();
        new.category_id = Some(category.id);
        let task = TaskStore::create(&store, new).await.unwrap();

        CategoryStore::delete(&store, category.id).await.unwrap();

        let task = TaskStore::get(&store, task.id).await.unwrap().unwrap();
        assert_eq!(task.category_id, None);
        assert_eq!(CategoryStore::get(&store, category.id).await.unwrap(), None);
    }
}
