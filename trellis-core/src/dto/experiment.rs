//! Experiment DTOs

use serde::{Deserialize, Serialize};

/// Response for a single experiment lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub name: String,
    pub id: String,
}
