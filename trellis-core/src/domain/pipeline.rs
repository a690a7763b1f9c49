//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of a pipeline registered in the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Pipeline description including its declared input parameters
///
/// Parameters are the inputs of the pipeline's most recent version, keyed by
/// name with their declared default values. Run submissions are validated
/// against these keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDetail {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parameters: HashMap<String, serde_json::Value>,
}

/// A version of an uploaded pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineVersion {
    pub id: String,
    pub name: String,
}
