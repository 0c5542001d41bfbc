//! Domain records for tasks and categories.
//!
//! Entities are plain data: they are created and mutated by a store
//! implementation and fed to the query engine as read-only snapshots.
//! Partial updates are explicit optional-field structs (`TaskPatch`,
//! `CategoryPatch`); a store applies only the fields that are present.

mod category;
mod task;

pub use category::{Category, CategoryId, CategoryPatch, NewCategory};
pub use task::{NewTask, Priority, Task, TaskId, TaskPatch};

use serde::{Deserialize, Deserializer};

/// Input rejected before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
}

/// Deserialize a field that distinguishes "absent" from "set to null".
///
/// Used with `#[serde(default)]`: a missing field stays `None`, an explicit
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
