//! API Module
//!
//! HTTP API layer for the adapter.
//! Each submodule handles endpoints for a specific resource of the wrapped
//! orchestrator.

pub mod error;
pub mod experiment;
pub mod health;
pub mod pipeline;
pub mod run;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pending::PendingRuns;
use trellis_client::OrchestratorClient;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub orchestrator: Arc<OrchestratorClient>,
    pub pending: PendingRuns,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe
        .route("/liveness", get(health::liveness))
        // Experiment endpoints
        .route("/experiments", get(experiment::list_experiments))
        .route("/experiments/{name}", get(experiment::get_experiment))
        // Pipeline endpoints
        .route("/pipelines", get(pipeline::list_pipelines))
        .route(
            "/pipelineIds/{name}",
            get(pipeline::get_pipeline_id).post(pipeline::upload_pipeline),
        )
        .route("/pipelines/{name}/versions", get(pipeline::list_versions))
        .route(
            "/pipelines/{id}",
            get(pipeline::get_pipeline).delete(pipeline::delete_pipeline),
        )
        // Run endpoints
        .route(
            "/trainingjobs/{name}/execution",
            post(run::execute_training_job),
        )
        .route("/runs", get(run::list_runs))
        .route("/runs/{id}", get(run::get_run).delete(run::delete_run))
        .route("/runs/{id}/terminate", post(run::terminate_run))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
