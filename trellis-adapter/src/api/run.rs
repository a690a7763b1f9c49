//! Run API Handlers
//!
//! HTTP endpoints for run submission, lookup, and termination. Submission is
//! where a run enters the pending table: once the orchestrator accepts it
//! without an immediate terminal state, the reconciler takes over.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::collections::HashMap;
use uuid::Uuid;

use trellis_client::CreateRun;
use trellis_core::domain::run::is_terminal;
use trellis_core::dto::run::{ExecuteTrainingJob, RunDescription, RunEntry, RunSubmitted};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /trainingjobs/{name}/execution
/// Submit a pipeline run for a training job
pub async fn execute_training_job(
    State(state): State<AppState>,
    Path(trainingjob_name): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<RunSubmitted>> {
    tracing::debug!("Run submission for training job: {}", trainingjob_name);

    let req: ExecuteTrainingJob = serde_json::from_value(body.clone())
        .map_err(|_| ApiError::bad_request_with_payload("Less arguments", body.clone()))?;

    let experiment = state
        .orchestrator
        .get_experiment(&req.experiment_name, &state.config.namespace)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request_with_payload("Experiment name does not exist", body.clone())
        })?;

    let pipeline_id = state
        .orchestrator
        .get_pipeline_id(&req.pipeline_name)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request_with_payload("Pipeline name does not exist", body.clone())
        })?;

    let detail = state.orchestrator.pipeline_detail(&pipeline_id).await?;
    let missing = missing_parameters(&req.arguments, &detail.parameters);
    if !missing.is_empty() {
        tracing::error!(
            "Arguments for {} missing pipeline parameters: {:?}",
            trainingjob_name,
            missing
        );
        return Err(ApiError::bad_request_with_payload(
            "Arguments do not match pipeline arguments",
            serde_json::json!({ "missing": missing }),
        ));
    }

    let version_id = state
        .orchestrator
        .get_pipeline_version_id(&pipeline_id, &req.pipeline_version)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request_with_payload("Pipeline version does not exist", body.clone())
        })?;

    let run = state
        .orchestrator
        .create_run(CreateRun {
            display_name: format!("{}-{}", trainingjob_name, Uuid::new_v4().simple()),
            experiment_id: experiment.id.clone(),
            pipeline_id: pipeline_id.clone(),
            pipeline_version_id: version_id,
            parameters: req.arguments,
        })
        .await?;

    tracing::info!("Run {} submitted for {}", run.id, trainingjob_name);

    let run_status = if run.state.is_empty() {
        "scheduled".to_string()
    } else {
        run.state.clone()
    };

    if !is_terminal(&run.state) {
        state.pending.track(&run.id, &trainingjob_name);
    }

    Ok(Json(RunSubmitted {
        trainingjob_name,
        run_id: run.id,
        run_name: run.name,
        run_status,
        experiment_name: req.experiment_name,
        experiment_id: experiment.id,
        pipeline_name: req.pipeline_name,
        pipeline_id,
    }))
}

/// GET /runs
/// List all runs as a name-keyed map
pub async fn list_runs(
    State(state): State<AppState>,
) -> ApiResult<Json<HashMap<String, RunEntry>>> {
    tracing::debug!("Listing runs");

    let runs = state.orchestrator.list_runs(&state.config.namespace).await?;

    Ok(Json(
        runs.into_iter()
            .map(|r| {
                (
                    r.name,
                    RunEntry {
                        run_id: r.id,
                        run_description: r.description,
                        run_status: r.state,
                        experiment_id: r.experiment_id,
                        pipeline_id: r.pipeline_id,
                    },
                )
            })
            .collect(),
    ))
}

/// GET /runs/{id}
/// Get run status by id
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RunDescription>> {
    tracing::debug!("Getting run: {}", id);

    let run = state.orchestrator.get_run(&id).await?;

    Ok(Json(RunDescription {
        run_id: run.id,
        run_name: run.name,
        run_status: run.state,
    }))
}

/// DELETE /runs/{id}
/// Run deletion is not supported
pub async fn delete_run(Path(id): Path<String>) -> ApiResult<StatusCode> {
    tracing::warn!("Delete requested for run {}, not supported", id);

    Err(ApiError::NotImplemented(
        "Method not supported yet".to_string(),
    ))
}

/// POST /runs/{id}/terminate
/// Terminate a run
pub async fn terminate_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    tracing::info!("Terminating run: {}", id);

    state.orchestrator.terminate_run(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Pipeline parameters that are not covered by the submitted arguments
fn missing_parameters(
    arguments: &HashMap<String, serde_json::Value>,
    declared: &HashMap<String, serde_json::Value>,
) -> Vec<String> {
    declared
        .keys()
        .filter(|name| !arguments.contains_key(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_parameters() {
        let declared: HashMap<_, _> = [
            ("epochs".to_string(), json!(10)),
            ("modelname".to_string(), serde_json::Value::Null),
        ]
        .into();

        let arguments: HashMap<_, _> = [("epochs".to_string(), json!(5))].into();
        let mut missing = missing_parameters(&arguments, &declared);
        missing.sort();
        assert_eq!(missing, vec!["modelname".to_string()]);
    }

    #[test]
    fn test_extra_arguments_are_allowed() {
        let declared: HashMap<_, _> = [("epochs".to_string(), json!(10))].into();
        let arguments: HashMap<_, _> = [
            ("epochs".to_string(), json!(5)),
            ("extra".to_string(), json!("ok")),
        ]
        .into();

        assert!(missing_parameters(&arguments, &declared).is_empty());
    }

    #[test]
    fn test_execute_request_rejects_missing_fields() {
        let body = json!({
            "arguments": {},
            "pipeline_name": "qoe",
            "experiment_name": "Default"
        });

        assert!(serde_json::from_value::<ExecuteTrainingJob>(body).is_err());
    }
}
