//! # TaskFlow
//!
//! Task management service with pluggable persistence.
//!
//! This library provides:
//! - Task and category records with validated creation and partial updates
//! - A pure query engine that turns store snapshots into the filtered,
//!   sorted, counted views shown to users
//! - A bulk operation coordinator over caller-selected task ids
//! - A storage capability set with two backends: in-memory and a remote
//!   backend-as-a-service, chosen once at startup via configuration
//!
//! ## Data Flow
//!
//! ```text
//!        ┌───────────────────────────────────┐
//!        │          HTTP API (axum)          │
//!        └──────┬─────────────────────┬──────┘
//!               │ intents             │ snapshots
//!               ▼                     ▼
//!        ┌────────────┐        ┌────────────┐
//!        │ TaskStore /│        │   query::  │
//!        │ Category-  │──────▶ │compute_view│
//!        │   Store    │        └────────────┘
//!        └────────────┘
//!          memory | remote
//! ```
//!
//! Mutations go through a store; the query engine only ever sees resolved
//! in-memory snapshots and recomputes the view after each round-trip.
//!
//! ## Modules
//! - `model`: task and category records, patches, validation
//! - `query`: filter / search / sort / count pipeline
//! - `bulk`: selection state and batch complete/delete
//! - `store`: storage traits and the two backends
//! - `api`: HTTP surface
//! - `config`: environment-based configuration

pub mod api;
pub mod bulk;
pub mod config;
pub mod model;
pub mod query;
pub mod store;

pub use bulk::Selection;
pub use config::Config;
pub use model::{Category, CategoryId, NewCategory, NewTask, Priority, Task, TaskId};
pub use query::{compute_view, TaskCounts, TaskStats, TaskView, ViewMode};
pub use store::{CategoryStore, InMemoryStore, RemoteStore, StoreError, TaskStore};
