//! Experiment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use std::collections::HashMap;
use trellis_core::dto::experiment::ExperimentSummary;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /experiments
/// List all experiments as a name-to-id map
pub async fn list_experiments(
    State(state): State<AppState>,
) -> ApiResult<Json<HashMap<String, String>>> {
    tracing::debug!("Listing experiments");

    let experiments = state
        .orchestrator
        .list_experiments(&state.config.namespace)
        .await?;

    Ok(Json(
        experiments.into_iter().map(|e| (e.name, e.id)).collect(),
    ))
}

/// GET /experiments/{name}
/// Get experiment details by name
pub async fn get_experiment(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ExperimentSummary>> {
    tracing::debug!("Getting experiment: {}", name);

    let experiment = state
        .orchestrator
        .get_experiment(&name, &state.config.namespace)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request_with_payload(
                "Experiment name does not exist",
                serde_json::json!({ "experiment_name": name }),
            )
        })?;

    Ok(Json(ExperimentSummary {
        name: experiment.name,
        id: experiment.id,
    }))
}
