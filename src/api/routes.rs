//! HTTP route handlers.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::checks;
use crate::config::Config;
use crate::pipeline::{Pipeline, RunResult, TaskRegistry};
use crate::table::load_table;

use super::tasks;
use super::types::*;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task registry; writers are serialized against lookups
    pub registry: RwLock<TaskRegistry>,
}

impl AppState {
    pub fn new(config: Config, registry: TaskRegistry) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: RwLock::new(registry),
        })
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks))
        .route("/run-pipeline", post(run_pipeline))
        .route("/add-task", post(tasks::add_task))
        .route("/update-task", post(tasks::update_task))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, TaskRegistry::with_defaults());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM/SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_path: state.config.dataset_path.display().to_string(),
        registered_tasks: state.registry.read().await.len(),
    })
}

/// List registered tasks and the compiled check catalog.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<TaskListResponse> {
    let tasks = state.registry.read().await.list();
    Json(TaskListResponse {
        tasks,
        catalog: checks::catalog(),
    })
}

/// Run the requested checks over the configured dataset.
pub async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunPipelineRequest>,
) -> Result<Json<RunResult>, ApiError> {
    let path = state.config.dataset_path.clone();
    let table = tokio::task::spawn_blocking(move || load_table(path))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Unable to load dataset: {}", e),
            )
        })?;

    // Resolve under the read lock, execute without it
    let plan = {
        let registry = state.registry.read().await;
        Pipeline::new(&registry)
            .unresolved(state.config.unresolved_policy())
            .plan(req.tasks)
    };

    let results = tokio::task::spawn_blocking(move || plan.execute(&table))
        .await
        .map_err(|e| {
            tracing::error!("Pipeline run aborted: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Pipeline run aborted")
        })?;

    Ok(Json(results))
}
