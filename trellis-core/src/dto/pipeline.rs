//! Pipeline DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response for a pipeline id lookup or upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineIdResponse {
    pub name: String,
    pub id: String,
}

/// Entry in the pipeline listing, keyed by pipeline name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEntry {
    pub id: String,
    pub description: Option<String>,
}

/// Response for a pipeline description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDescription {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub arguments: HashMap<String, serde_json::Value>,
}

/// Response for a pipeline deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDeleted {
    pub id: String,
    pub status: String,
}

/// Response listing versions of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionList {
    pub versions_list: Vec<String>,
}
