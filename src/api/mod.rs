//! HTTP API for the check pipeline.
//!
//! ## Endpoints
//!
//! - `POST /run-pipeline` - Run an ordered list of checks over the configured dataset
//! - `POST /add-task` - Register a task name backed by a compiled check
//! - `POST /update-task` - Re-bind an existing task name
//! - `GET /tasks` - List registered tasks and the check catalog
//! - `GET /health` - Health check

mod routes;
pub mod tasks;
pub mod types;

pub use routes::{list_tasks, router, run_pipeline, serve, ApiError, AppState};
pub use types::*;
