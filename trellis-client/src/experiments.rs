//! Experiment-related API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use serde::Deserialize;
use trellis_core::domain::experiment::Experiment;

/// Page size when listing experiments
const EXPERIMENT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct WireExperiment {
    experiment_id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct WireExperimentList {
    #[serde(default)]
    experiments: Vec<WireExperiment>,
}

impl From<WireExperiment> for Experiment {
    fn from(wire: WireExperiment) -> Self {
        Experiment {
            id: wire.experiment_id,
            name: wire.display_name,
        }
    }
}

impl OrchestratorClient {
    /// List experiments in a namespace
    pub async fn list_experiments(&self, namespace: &str) -> Result<Vec<Experiment>> {
        let url = format!("{}/apis/v2beta1/experiments", self.base_url);
        let page_size = EXPERIMENT_PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("namespace", namespace), ("page_size", page_size.as_str())])
            .send()
            .await?;

        let list: WireExperimentList = self.handle_response(response).await?;
        Ok(list.experiments.into_iter().map(Experiment::from).collect())
    }

    /// Look up an experiment by display name
    ///
    /// Returns `Ok(None)` when no experiment with that name exists in the
    /// namespace.
    pub async fn get_experiment(&self, name: &str, namespace: &str) -> Result<Option<Experiment>> {
        let experiments = self.list_experiments(namespace).await?;
        Ok(experiments.into_iter().find(|e| e.name == name))
    }
}
