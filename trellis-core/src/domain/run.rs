//! Run domain types and state predicates
//!
//! The orchestrator reports run state as a plain string. The adapter never
//! interprets states beyond the terminal set below, so state stays a string
//! end to end; the notification wire carries it verbatim.

use serde::{Deserialize, Serialize};

/// Synthetic state assigned when the orchestrator cannot be queried.
///
/// Signals that the run's true state is unknown and requires human
/// follow-up. Sent to the training manager verbatim in `run_status`.
pub const MANUAL_RECONCILE: &str = "Manual reconcile";

/// A pipeline run in the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub name: String,
    /// Current state as reported by the orchestrator (e.g. "RUNNING",
    /// "SUCCEEDED"). Empty when the orchestrator has not reported one yet.
    pub state: String,
    pub description: Option<String>,
    pub experiment_id: Option<String>,
    pub pipeline_id: Option<String>,
    pub pipeline_version_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Returns true if the run state admits no further transitions
pub fn is_terminal(state: &str) -> bool {
    const TERMINAL: [&str; 5] = ["SUCCEEDED", "FAILED", "ERROR", "SKIPPED", "TERMINATED"];
    TERMINAL.iter().any(|t| state.eq_ignore_ascii_case(t))
}

/// Returns true if the state should resolve a pending run: either terminal
/// or the manual-reconciliation sentinel
pub fn resolves_pending(state: &str) -> bool {
    is_terminal(state) || state == MANUAL_RECONCILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(is_terminal("SUCCEEDED"));
        assert!(is_terminal("FAILED"));
        assert!(is_terminal("ERROR"));
        assert!(is_terminal("SKIPPED"));
        assert!(is_terminal("TERMINATED"));
    }

    #[test]
    fn test_terminal_is_case_insensitive() {
        assert!(is_terminal("succeeded"));
        assert!(is_terminal("Failed"));
    }

    #[test]
    fn test_non_terminal_states() {
        assert!(!is_terminal("RUNNING"));
        assert!(!is_terminal("PENDING"));
        assert!(!is_terminal(""));
    }

    #[test]
    fn test_sentinel_resolves_pending() {
        assert!(resolves_pending(MANUAL_RECONCILE));
        assert!(resolves_pending("SUCCEEDED"));
        assert!(!resolves_pending("RUNNING"));
    }
}
