//! Bulk operations over a caller-selected set of task ids.
//!
//! The coordinator issues one batch request per operation and reconciles
//! the selection afterwards. The two operations deliberately report success
//! differently:
//! - complete returns only the ids the store confirmed;
//! - delete reports every requested id as removed, even when the store's
//!   result payload is empty.
//! Unifying the two would change observable behavior; the asymmetry is a
//! documented policy, not an accident.

use crate::model::{Task, TaskId, TaskPatch};
use crate::store::{StoreError, TaskStore};

/// A caller-owned, ordered set of selected task ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<TaskId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<TaskId>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.ids.contains(&id)
    }

    pub fn as_slice(&self) -> &[TaskId] {
        &self.ids
    }

    /// Flip membership of one id, preserving selection order.
    pub fn toggle(&mut self, id: TaskId) {
        if let Some(pos) = self.ids.iter().position(|&selected| selected == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Select every visible task, unless all of them are already selected,
    /// in which case clear. One atomic toggle over the visible list, not
    /// the full collection.
    pub fn toggle_all(&mut self, visible: &[Task]) {
        if self.ids.len() == visible.len() {
            self.ids.clear();
        } else {
            self.ids = visible.iter().map(|task| task.id).collect();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Mark every selected task completed.
///
/// Returns the subset the store confirmed; ids the store dropped are
/// missing from the result, not errors. The selection is cleared on any
/// completed request (full or partial) and left intact when the request
/// itself fails, so the caller keeps its last-known-good state.
pub async fn complete_selected(
    store: &dyn TaskStore,
    selection: &mut Selection,
) -> Result<Vec<Task>, StoreError> {
    if selection.is_empty() {
        return Ok(Vec::new());
    }
    let confirmed = store
        .bulk_update(selection.as_slice(), TaskPatch::complete())
        .await?;
    tracing::debug!(
        requested = selection.len(),
        confirmed = confirmed.len(),
        "bulk complete finished"
    );
    selection.clear();
    Ok(confirmed)
}

/// Delete every selected task.
///
/// Every requested id is reported removed once the batch request succeeds,
/// regardless of per-id confirmation. The selection is cleared on success
/// and left intact when the request fails.
pub async fn delete_selected(
    store: &dyn TaskStore,
    selection: &mut Selection,
) -> Result<Vec<TaskId>, StoreError> {
    if selection.is_empty() {
        return Ok(Vec::new());
    }
    store.bulk_delete(selection.as_slice()).await?;
    let removed = selection.as_slice().to_vec();
    tracing::debug!(removed = removed.len(), "bulk delete finished");
    selection.clear();
    Ok(removed)
}
