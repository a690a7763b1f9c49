//! Run DTOs
//!
//! Includes the notification payload posted to the training manager when a
//! tracked run resolves. Its field names are a wire contract with the
//! manager and must not change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for POST /trainingjobs/{name}/execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTrainingJob {
    pub arguments: HashMap<String, serde_json::Value>,
    pub pipeline_name: String,
    pub experiment_name: String,
    pub pipeline_version: String,
}

/// Response for a submitted run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSubmitted {
    pub trainingjob_name: String,
    pub run_id: String,
    pub run_name: String,
    pub run_status: String,
    pub experiment_name: String,
    pub experiment_id: String,
    pub pipeline_name: String,
    pub pipeline_id: String,
}

/// Entry in the run listing, keyed by run name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub run_id: String,
    pub run_description: Option<String>,
    pub run_status: String,
    pub experiment_id: Option<String>,
    pub pipeline_id: Option<String>,
}

/// Response for a single run lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDescription {
    pub run_id: String,
    pub run_name: String,
    pub run_status: String,
}

/// Completion notification posted to the training manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunNotification {
    pub run_id: String,
    pub run_status: String,
    pub trainingjob_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_wire_field_names() {
        let note = RunNotification {
            run_id: "abc".to_string(),
            run_status: "SUCCEEDED".to_string(),
            trainingjob_name: "job-1".to_string(),
        };

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["run_id"], "abc");
        assert_eq!(value["run_status"], "SUCCEEDED");
        assert_eq!(value["trainingjob_name"], "job-1");
    }
}
