//! Task record, creation payload, and partial update.
//!
//! # Invariants
//! - `title` is non-empty after trimming (enforced by `NewTask::new`)
//! - `id` and `created_at` are assigned once by the store and never change

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{double_option, CategoryId, ValidationError};

/// Unique identifier for a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Create a fresh unique task ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority. Higher priorities sort first in the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank used by the active-view comparator: `high(3) > medium(2) > low(1)`.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A task record as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Referenced category, or `None` when uncategorized. A dangling
    /// reference (deleted category) is tolerated everywhere: it matches no
    /// category filter and contributes only to the `all` count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub priority: Priority,
    /// Due date with date-only semantics. No time-of-day comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
}

impl Task {
    /// Whether this task belongs to the active view partition.
    pub fn is_active(&self) -> bool {
        !self.completed && !self.archived
    }
}

/// Payload for creating a task. The store assigns `id`, `created_at`,
/// `completed = false`, and `archived = false`.
///
/// Construction is the validation boundary: a blank title is rejected here,
/// before any store call happens.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Create a task payload with a trimmed, non-empty title.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyTitle` when the title is empty or
    /// whitespace-only.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            category_id: None,
            priority: Priority::default(),
            due_date: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Partial update for a task. Absent fields are left untouched.
///
/// `category_id` and `due_date` are nullable, so they use a second `Option`
/// level: `None` = leave alone, `Some(None)` = clear, `Some(Some(v))` = set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

impl TaskPatch {
    /// Patch that marks a task completed.
    pub fn complete() -> Self {
        Self {
            completed: Some(true),
            ..Self::default()
        }
    }

    /// Patch that moves a task into the archive.
    pub fn archive() -> Self {
        Self {
            archived: Some(true),
            ..Self::default()
        }
    }

    /// Patch that restores an archived task to the active view.
    pub fn restore() -> Self {
        Self {
            archived: Some(false),
            completed: Some(false),
            ..Self::default()
        }
    }

    /// Apply the present fields to a task in place.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(archived) = self.archived {
            task.archived = archived;
        }
    }
}
