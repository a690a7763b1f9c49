//! Run-related API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trellis_core::domain::run::Run;

/// Page size when listing runs
const RUN_PAGE_SIZE: u32 = 20;

/// Request to submit a new pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct CreateRun {
    /// Display name for the run
    pub display_name: String,
    /// Experiment the run is grouped under
    pub experiment_id: String,
    /// Pipeline to run
    pub pipeline_id: String,
    /// Version of the pipeline to run
    pub pipeline_version_id: String,
    /// Runtime parameters, validated against the pipeline's declared inputs
    pub parameters: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WireRun {
    run_id: String,
    display_name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    experiment_id: Option<String>,
    #[serde(default)]
    pipeline_version_reference: Option<WireVersionReference>,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireVersionReference {
    #[serde(default)]
    pipeline_id: Option<String>,
    #[serde(default)]
    pipeline_version_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRunList {
    #[serde(default)]
    runs: Vec<WireRun>,
}

#[derive(Debug, Serialize)]
struct WireCreateRun<'a> {
    display_name: &'a str,
    experiment_id: &'a str,
    pipeline_version_reference: WireCreateVersionReference<'a>,
    runtime_config: WireRuntimeConfig<'a>,
}

#[derive(Debug, Serialize)]
struct WireCreateVersionReference<'a> {
    pipeline_id: &'a str,
    pipeline_version_id: &'a str,
}

#[derive(Debug, Serialize)]
struct WireRuntimeConfig<'a> {
    parameters: &'a HashMap<String, serde_json::Value>,
}

impl From<WireRun> for Run {
    fn from(wire: WireRun) -> Self {
        let (pipeline_id, pipeline_version_id) = match wire.pipeline_version_reference {
            Some(reference) => (reference.pipeline_id, reference.pipeline_version_id),
            None => (None, None),
        };

        Run {
            id: wire.run_id,
            name: wire.display_name,
            state: wire.state.unwrap_or_default(),
            description: wire.description,
            experiment_id: wire.experiment_id,
            pipeline_id,
            pipeline_version_id,
            created_at: wire.created_at,
        }
    }
}

impl OrchestratorClient {
    /// Get a run by id
    pub async fn get_run(&self, run_id: &str) -> Result<Run> {
        let url = format!("{}/apis/v2beta1/runs/{}", self.base_url, run_id);
        let response = self.client.get(&url).send().await?;

        let wire: WireRun = self.handle_response(response).await?;
        Ok(wire.into())
    }

    /// List runs in a namespace
    pub async fn list_runs(&self, namespace: &str) -> Result<Vec<Run>> {
        let url = format!("{}/apis/v2beta1/runs", self.base_url);
        let page_size = RUN_PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("namespace", namespace), ("page_size", page_size.as_str())])
            .send()
            .await?;

        let list: WireRunList = self.handle_response(response).await?;
        Ok(list.runs.into_iter().map(Run::from).collect())
    }

    /// Submit a new pipeline run
    pub async fn create_run(&self, req: CreateRun) -> Result<Run> {
        tracing::debug!("Submitting run {} to orchestrator", req.display_name);

        let url = format!("{}/apis/v2beta1/runs", self.base_url);
        let body = WireCreateRun {
            display_name: &req.display_name,
            experiment_id: &req.experiment_id,
            pipeline_version_reference: WireCreateVersionReference {
                pipeline_id: &req.pipeline_id,
                pipeline_version_id: &req.pipeline_version_id,
            },
            runtime_config: WireRuntimeConfig {
                parameters: &req.parameters,
            },
        };
        let response = self.client.post(&url).json(&body).send().await?;

        let wire: WireRun = self.handle_response(response).await?;
        Ok(wire.into())
    }

    /// Terminate a run
    pub async fn terminate_run(&self, run_id: &str) -> Result<()> {
        let url = format!("{}/apis/v2beta1/runs/{}:terminate", self.base_url, run_id);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
