//! Pipeline API Handlers
//!
//! HTTP endpoints for pipeline lookup, upload, versioning, and deletion.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use std::collections::HashMap;
use trellis_core::dto::pipeline::{
    PipelineDeleted, PipelineDescription, PipelineEntry, PipelineIdResponse, VersionList,
};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /pipelines
/// List all pipelines as a name-keyed map
pub async fn list_pipelines(
    State(state): State<AppState>,
) -> ApiResult<Json<HashMap<String, PipelineEntry>>> {
    tracing::debug!("Listing pipelines");

    let pipelines = state.orchestrator.list_pipelines().await?;

    Ok(Json(
        pipelines
            .into_iter()
            .map(|p| {
                (
                    p.name,
                    PipelineEntry {
                        id: p.id,
                        description: p.description,
                    },
                )
            })
            .collect(),
    ))
}

/// GET /pipelineIds/{name}
/// Look up a pipeline id by name
pub async fn get_pipeline_id(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<PipelineIdResponse>> {
    tracing::debug!("Getting pipeline id for: {}", name);

    let id = state
        .orchestrator
        .get_pipeline_id(&name)
        .await?
        .ok_or_else(|| {
            ApiError::bad_request_with_payload(
                "Pipeline name does not exist",
                serde_json::json!({ "pipeline_name": name }),
            )
        })?;

    Ok(Json(PipelineIdResponse { name, id }))
}

/// POST /pipelineIds/{name}
/// Upload a pipeline package (multipart: `file` part + `description` field)
///
/// The first upload under a name creates the pipeline; later uploads create
/// a new version named after the version count.
pub async fn upload_pipeline(
    State(state): State<AppState>,
    Path(name): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Json<PipelineIdResponse>> {
    tracing::debug!("Upload received for pipeline: {}", name);

    let mut package: Option<(String, Vec<u8>)> = None;
    let mut description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart request: {}", e)))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("pipeline.yaml").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Error reading file from POST: {}", e))
                })?;
                package = Some((file_name, bytes.to_vec()));
            }
            Some("description") => {
                description = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Error reading description: {}", e))
                })?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        package.ok_or_else(|| ApiError::bad_request("Missing file part in POST"))?;

    let id = match state.orchestrator.get_pipeline_id(&name).await? {
        None => {
            let pipeline = state
                .orchestrator
                .upload_pipeline(&name, &description, &file_name, bytes)
                .await?;
            tracing::info!("Pipeline {} uploaded as {}", name, pipeline.id);
            pipeline.id
        }
        Some(pipeline_id) => {
            let versions = state.orchestrator.list_pipeline_versions(&pipeline_id).await?;
            let version_name = (versions.len() + 1).to_string();
            state
                .orchestrator
                .upload_pipeline_version(&pipeline_id, &version_name, &file_name, bytes)
                .await?;
            tracing::info!("Pipeline {} uploaded as version {}", name, version_name);
            pipeline_id
        }
    };

    Ok(Json(PipelineIdResponse { name, id }))
}

/// GET /pipelines/{name}/versions
/// List version names for a pipeline
///
/// An unknown pipeline name yields an empty list.
pub async fn list_versions(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<VersionList>> {
    tracing::debug!("Listing versions for pipeline: {}", name);

    let versions_list = match state.orchestrator.get_pipeline_id(&name).await? {
        Some(pipeline_id) => state
            .orchestrator
            .list_pipeline_versions(&pipeline_id)
            .await?
            .into_iter()
            .map(|v| v.name)
            .collect(),
        None => Vec::new(),
    };

    Ok(Json(VersionList { versions_list }))
}

/// GET /pipelines/{id}
/// Get pipeline description including declared arguments
pub async fn get_pipeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PipelineDescription>> {
    tracing::debug!("Getting pipeline: {}", id);

    let detail = state.orchestrator.pipeline_detail(&id).await?;

    Ok(Json(PipelineDescription {
        id: detail.id,
        name: detail.name,
        description: detail.description,
        arguments: detail.parameters,
    }))
}

/// DELETE /pipelines/{id}
/// Delete a pipeline
pub async fn delete_pipeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PipelineDeleted>> {
    tracing::info!("Deleting pipeline: {}", id);

    state.orchestrator.delete_pipeline(&id).await?;

    Ok(Json(PipelineDeleted {
        id,
        status: "Deleted".to_string(),
    }))
}
