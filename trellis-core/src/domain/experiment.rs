//! Experiment domain types

use serde::{Deserialize, Serialize};

/// An experiment registered in the orchestrator
///
/// Runs are grouped under experiments; the adapter only ever needs the
/// name-to-id mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
}
