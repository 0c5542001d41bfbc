//! HTTP API for TaskFlow.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/stats` - Dashboard counters over the active view
//! - `GET /api/views/:mode` - Computed view (`active` or `archived`) with
//!   optional `category` and `q` filters
//! - `GET /api/tasks/active` / `GET /api/tasks/archived` - Raw listings
//! - `POST /api/tasks` - Create a task
//! - `GET/PATCH/DELETE /api/tasks/:id` - Single-task operations
//! - `POST /api/tasks/:id/archive` / `POST /api/tasks/:id/restore`
//! - `POST /api/tasks/bulk/complete` / `POST /api/tasks/bulk/delete`
//! - `POST /api/tasks/archive/clear` - Delete every archived task
//! - `GET/POST /api/categories`, `GET/PATCH/DELETE /api/categories/:id`

mod categories;
mod routes;
mod tasks;
mod views;

pub use routes::{serve, AppState};
