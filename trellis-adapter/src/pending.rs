//! Pending-run table
//!
//! Shared mapping from run id to training job name. An entry exists from the
//! moment the orchestrator accepts a run without an immediate terminal state
//! until the reconciler observes a terminal (or sentinel) state. Nothing is
//! persisted; entries are lost if the process dies.
//!
//! Locking is internal to the operations here so call sites never touch the
//! mutex directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Cloneable handle to the shared pending-run table
#[derive(Debug, Clone, Default)]
pub struct PendingRuns {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl PendingRuns {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a run for the given training job
    pub fn track(&self, run_id: impl Into<String>, trainingjob_name: impl Into<String>) {
        let mut runs = self.inner.lock().unwrap();
        runs.insert(run_id.into(), trainingjob_name.into());
    }

    /// Copy of the current entries
    ///
    /// The lock is released before the caller iterates, so inserts happening
    /// during a poll cycle are picked up on the next one.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        let runs = self.inner.lock().unwrap();
        runs.iter()
            .map(|(id, name)| (id.clone(), name.clone()))
            .collect()
    }

    /// Stop tracking a run, returning the training job name if it was tracked
    pub fn remove(&self, run_id: &str) -> Option<String> {
        let mut runs = self.inner.lock().unwrap();
        runs.remove(run_id)
    }

    /// Number of tracked runs
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// True when no runs are tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_and_remove() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");
        pending.track("run-2", "job-b");

        assert_eq!(pending.len(), 2);
        assert_eq!(pending.remove("run-1"), Some("job-a".to_string()));
        assert_eq!(pending.remove("run-1"), None);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_track_overwrites_existing_entry() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");
        pending.track("run-1", "job-b");

        assert_eq!(pending.len(), 1);
        assert_eq!(pending.remove("run-1"), Some("job-b".to_string()));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let snapshot = pending.snapshot();
        pending.remove("run-1");

        assert_eq!(snapshot, vec![("run-1".to_string(), "job-a".to_string())]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_concurrent_inserts_are_not_lost() {
        let pending = PendingRuns::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let pending = pending.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        pending.track(format!("run-{}-{}", i, j), "job");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(pending.len(), 8 * 50);
    }
}
