//! The task view engine: filter, search, sort, and count.
//!
//! `compute_view` is the single entry point. It is pure and synchronous: it
//! takes already-fetched snapshots, never touches a store, and has no
//! failure modes over well-typed input. Callers re-run it after every
//! mutation round-trip; it is cheap enough to run on every state change.
//!
//! The active/archived partition is applied by the store (`list_active` /
//! `list_archived`) before the snapshot reaches this module. The engine
//! filters and sorts whatever collection it is handed; it never re-derives
//! the partition, so passing a pre-partitioned set is part of the contract.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Category, CategoryId, Task};

/// Which of the two views is being computed. Selects the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Priority first, then due date, then recency.
    Active,
    /// Recency only.
    Archived,
}

/// Per-category task counts over the unfiltered snapshot.
///
/// These power the category-pill badges: they always reflect the full
/// collection, regardless of the category or search filter currently
/// applied to the visible list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    /// Total number of tasks in the snapshot.
    pub all: usize,
    /// Count per known category. Tasks referencing an unknown category
    /// appear in no entry here, only in `all`.
    pub by_category: HashMap<CategoryId, usize>,
}

impl TaskCounts {
    /// Count tasks per category over the full (unfiltered) snapshot.
    pub fn compute(tasks: &[Task], categories: &[Category]) -> Self {
        let mut by_category = HashMap::with_capacity(categories.len());
        for category in categories {
            let count = tasks
                .iter()
                .filter(|task| task.category_id == Some(category.id))
                .count();
            by_category.insert(category.id, count);
        }
        Self {
            all: tasks.len(),
            by_category,
        }
    }

    /// Count for one category; zero when the category is unknown.
    pub fn for_category(&self, id: CategoryId) -> usize {
        self.by_category.get(&id).copied().unwrap_or(0)
    }
}

/// The computed view: the ordered visible list plus category counts.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub visible: Vec<Task>,
    pub counts: TaskCounts,
}

/// Compute the visible task list and category counts for one view.
///
/// Stages run in fixed order over a copy of the input:
/// 1. category filter (skipped when `selected_category` is `None`)
/// 2. search filter (case-insensitive substring on the title; a
///    whitespace-only query is a no-op)
/// 3. sort per `mode`
///
/// Counts are computed independently over the unfiltered input.
pub fn compute_view(
    tasks: &[Task],
    categories: &[Category],
    selected_category: Option<CategoryId>,
    search: &str,
    mode: ViewMode,
) -> TaskView {
    let needle = search.trim().to_lowercase();

    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| match selected_category {
            Some(selected) => task.category_id == Some(selected),
            None => true,
        })
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    match mode {
        ViewMode::Active => visible.sort_by(active_order),
        ViewMode::Archived => visible.sort_by(archived_order),
    }

    TaskView {
        visible,
        counts: TaskCounts::compute(tasks, categories),
    }
}

/// Active-view order: priority descending, then due date ascending (a task
/// with a due date precedes one without), then `created_at` descending.
fn active_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        })
}

/// Archived-view order: `created_at` descending, nothing else.
fn archived_order(a: &Task, b: &Task) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// Dashboard counters derived from an active-view snapshot.
///
/// `today` is an explicit parameter so the computation stays deterministic;
/// callers pass the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// Tasks not yet completed.
    pub active: usize,
    /// Uncompleted tasks due today.
    pub due_today: usize,
    /// Uncompleted tasks whose due date has passed.
    pub overdue: usize,
    /// Completed tasks whose due date is today.
    pub completed_today: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let active = tasks.iter().filter(|t| !t.completed).count();
        let due_today = tasks
            .iter()
            .filter(|t| !t.completed && t.due_date == Some(today))
            .count();
        let overdue = tasks
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some_and(|due| due < today))
            .count();
        let completed_today = tasks
            .iter()
            .filter(|t| t.completed && t.due_date == Some(today))
            .count();
        Self {
            active,
            due_today,
            overdue,
            completed_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskId};
    use chrono::{Duration, TimeZone, Utc};

    fn task(title: &str, priority: Priority) -> Task {
        Task {
            id: TaskId::new(),
            title: title.to_string(),
            completed: false,
            category_id: None,
            priority,
            due_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            archived: false,
        }
    }

    fn titles(view: &TaskView) -> Vec<&str> {
        view.visible.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn all_count_tracks_total_regardless_of_filters() {
        let work = Category {
            id: CategoryId::new(),
            name: "Work".to_string(),
            color: "#5B21B6".to_string(),
            icon: "Briefcase".to_string(),
        };
        let mut tasks = vec![
            task("write report", Priority::High),
            task("buy milk", Priority::Low),
            task("walk dog", Priority::Medium),
        ];
        tasks[0].category_id = Some(work.id);
        let categories = vec![work.clone()];

        let filtered = compute_view(
            &tasks,
            &categories,
            Some(work.id),
            "report",
            ViewMode::Active,
        );
        assert_eq!(filtered.visible.len(), 1);
        assert_eq!(filtered.counts.all, 3);
        assert_eq!(filtered.counts.for_category(work.id), 1);

        // Same counts with no filters at all.
        let unfiltered = compute_view(&tasks, &categories, None, "", ViewMode::Active);
        assert_eq!(unfiltered.counts, filtered.counts);
    }

    #[test]
    fn counts_ignore_dangling_category_references() {
        let known = Category {
            id: CategoryId::new(),
            name: "Home".to_string(),
            color: "#0D9488".to_string(),
            icon: "Home".to_string(),
        };
        let mut tasks = vec![task("a", Priority::Medium), task("b", Priority::Medium)];
        tasks[0].category_id = Some(known.id);
        // References a category that no longer exists.
        tasks[1].category_id = Some(CategoryId::new());

        let counts = TaskCounts::compute(&tasks, std::slice::from_ref(&known));
        assert_eq!(counts.all, 2);
        assert_eq!(counts.for_category(known.id), 1);
        assert_eq!(counts.by_category.len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_and_trimmed() {
        let tasks = vec![
            task("Review Pull Request", Priority::Medium),
            task("water plants", Priority::Medium),
        ];
        let view = compute_view(&tasks, &[], None, "  REVIEW ", ViewMode::Active);
        assert_eq!(titles(&view), vec!["Review Pull Request"]);
    }

    #[test]
    fn search_is_idempotent() {
        let tasks = vec![
            task("plan sprint", Priority::High),
            task("plan dinner", Priority::Low),
            task("send invoices", Priority::Medium),
        ];
        let once = compute_view(&tasks, &[], None, "plan", ViewMode::Active);
        let twice = compute_view(&once.visible, &[], None, "plan", ViewMode::Active);
        assert_eq!(once.visible, twice.visible);
    }

    #[test]
    fn blank_search_is_a_noop() {
        let tasks = vec![task("a", Priority::Medium), task("b", Priority::Medium)];
        let view = compute_view(&tasks, &[], None, "   ", ViewMode::Active);
        assert_eq!(view.visible.len(), 2);
    }

    #[test]
    fn active_sort_orders_by_priority() {
        let tasks = vec![
            task("low", Priority::Low),
            task("high", Priority::High),
            task("medium", Priority::Medium),
        ];
        let view = compute_view(&tasks, &[], None, "", ViewMode::Active);
        assert_eq!(titles(&view), vec!["high", "medium", "low"]);
    }

    #[test]
    fn due_date_breaks_priority_ties() {
        let mut with_due = task("with due", Priority::Medium);
        with_due.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        let without_due = task("without due", Priority::Medium);

        let view = compute_view(
            &[without_due, with_due],
            &[],
            None,
            "",
            ViewMode::Active,
        );
        assert_eq!(titles(&view), vec!["with due", "without due"]);
    }

    #[test]
    fn earlier_due_date_sorts_first_among_ties() {
        let mut later = task("later", Priority::High);
        later.due_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let mut sooner = task("sooner", Priority::High);
        sooner.due_date = NaiveDate::from_ymd_opt(2024, 2, 1);

        let view = compute_view(&[later, sooner], &[], None, "", ViewMode::Active);
        assert_eq!(titles(&view), vec!["sooner", "later"]);
    }

    #[test]
    fn undated_ties_fall_back_to_recency() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut older = task("older", Priority::Medium);
        older.created_at = base;
        let mut newer = task("newer", Priority::Medium);
        newer.created_at = base + Duration::hours(1);

        let view = compute_view(&[older, newer], &[], None, "", ViewMode::Active);
        assert_eq!(titles(&view), vec!["newer", "older"]);
    }

    #[test]
    fn archived_sort_ignores_priority() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut t1 = task("t1", Priority::High);
        t1.created_at = base;
        let mut t2 = task("t2", Priority::Low);
        t2.created_at = base + Duration::hours(1);
        let mut t3 = task("t3", Priority::Medium);
        t3.created_at = base + Duration::hours(2);

        let view = compute_view(&[t1, t2, t3], &[], None, "", ViewMode::Archived);
        assert_eq!(titles(&view), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn input_snapshot_is_not_mutated() {
        let tasks = vec![task("z", Priority::Low), task("a", Priority::High)];
        let before = tasks.clone();
        let _ = compute_view(&tasks, &[], None, "", ViewMode::Active);
        assert_eq!(tasks, before);
    }

    #[test]
    fn end_to_end_view() {
        let work = Category {
            id: CategoryId::new(),
            name: "Work".to_string(),
            color: "#5B21B6".to_string(),
            icon: "Briefcase".to_string(),
        };
        let urgent = task("urgent thing", Priority::High);
        let mut chore = task("small chore", Priority::Low);
        chore.category_id = Some(work.id);

        let view = compute_view(
            &[urgent.clone(), chore.clone()],
            std::slice::from_ref(&work),
            None,
            "",
            ViewMode::Active,
        );

        assert_eq!(titles(&view), vec!["urgent thing", "small chore"]);
        assert_eq!(view.counts.all, 2);
        assert_eq!(view.counts.for_category(work.id), 1);
    }

    #[test]
    fn stats_partition_by_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mut due_today = task("due today", Priority::Medium);
        due_today.due_date = Some(today);
        let mut overdue = task("overdue", Priority::Medium);
        overdue.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let mut done_today = task("done today", Priority::Medium);
        done_today.due_date = Some(today);
        done_today.completed = true;
        let undated = task("undated", Priority::Medium);

        let stats = TaskStats::compute(&[due_today, overdue, done_today, undated], today);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.completed_today, 1);
    }
}
