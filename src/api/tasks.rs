//! Task registry endpoints.
//!
//! New tasks are bound to a compiled check kind from [`checks::catalog`];
//! request bodies never carry executable code.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::checks;
use crate::pipeline::CheckTask;

use super::routes::{api_error, ApiError, AppState};
use super::types::{MessageResponse, TaskMutationRequest};

enum Mutation {
    Add,
    Update,
}

fn resolve(req: TaskMutationRequest) -> Result<(String, Arc<dyn CheckTask>), ApiError> {
    let (Some(name), Some(kind)) = (
        req.task_name.filter(|n| !n.is_empty()),
        req.task_kind.filter(|k| !k.is_empty()),
    ) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Missing task_name or task_kind",
        ));
    };
    let task = checks::builtin(&kind).ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            format!("Unknown task kind '{}'", kind),
        )
    })?;
    Ok((name, task))
}

async fn mutate(
    state: &AppState,
    req: TaskMutationRequest,
    mutation: Mutation,
) -> Result<Json<MessageResponse>, ApiError> {
    let (name, task) = resolve(req)?;
    let status = {
        let mut registry = state.registry.write().await;
        match mutation {
            Mutation::Add => registry.add(name.clone(), task),
            Mutation::Update => registry.update(name.clone(), task),
        }
    };
    if status.is_applied() {
        tracing::info!("Registry: {}", status.message(&name));
    }
    Ok(Json(MessageResponse {
        message: status.message(&name),
    }))
}

/// Register a task name backed by a compiled check.
pub async fn add_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskMutationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    mutate(&state, req, Mutation::Add).await
}

/// Re-bind an existing task name to a compiled check.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskMutationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    mutate(&state, req, Mutation::Update).await
}
