//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::pipeline::{Invocation, TaskInfo};

/// Request to run a pipeline over the configured dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunPipelineRequest {
    /// Ordered invocations; options sit inline next to each `name`
    #[serde(default)]
    pub tasks: Vec<Invocation>,
}

/// Request to register (or re-bind) a task name to a compiled check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskMutationRequest {
    /// Name the task is registered under
    pub task_name: Option<String>,

    /// Built-in check kind backing the task (see `GET /tasks` catalog)
    pub task_kind: Option<String>,
}

/// Status message of a registry mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Registered tasks and the compiled kinds available to back new ones.
#[derive(Debug, Clone, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskInfo>,
    pub catalog: Vec<TaskInfo>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dataset_path: String,
    pub registered_tasks: usize,
}
