//! Run-status reconciler
//!
//! Background loop that resolves tracked runs to a terminal status and
//! notifies the training manager. On a fixed cadence it snapshots the
//! pending table and, for each run, queries the orchestrator for the current
//! state. A failed query is folded into the manual-reconciliation sentinel
//! rather than retried. Once a run is terminal (or the sentinel), exactly
//! one best-effort notification is attempted and the entry is removed,
//! whether or not the delivery succeeded.
//!
//! The loop never surfaces errors to a caller; everything is logged and the
//! next cycle proceeds. It runs for the lifetime of the process.

use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{debug, info, warn};

use crate::notify::CompletionNotifier;
use crate::pending::PendingRuns;
use async_trait::async_trait;
use trellis_client::{ClientError, OrchestratorClient};
use trellis_core::domain::run::{MANUAL_RECONCILE, resolves_pending};
use trellis_core::dto::run::RunNotification;

/// Seam for querying the current state of a run
#[async_trait]
pub trait RunStatusSource: Send + Sync {
    /// Current state string for the run, as reported by the orchestrator
    async fn run_state(&self, run_id: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl RunStatusSource for OrchestratorClient {
    async fn run_state(&self, run_id: &str) -> Result<String, ClientError> {
        Ok(self.get_run(run_id).await?.state)
    }
}

/// Reconciler that continuously resolves pending runs
pub struct RunReconciler {
    interval: Duration,
    pending: PendingRuns,
    orchestrator: Arc<dyn RunStatusSource>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl RunReconciler {
    /// Creates a new reconciler
    pub fn new(
        interval: Duration,
        pending: PendingRuns,
        orchestrator: Arc<dyn RunStatusSource>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        Self {
            interval,
            pending,
            orchestrator,
            notifier,
        }
    }

    /// Starts the polling loop
    pub async fn run(self) {
        info!(
            "Starting run-status reconciler (interval: {:?})",
            self.interval
        );

        let mut interval = time::interval(self.interval);

        loop {
            interval.tick().await;

            debug!("Polling {} pending run(s)", self.pending.len());

            let resolved = self.poll_once().await;
            if resolved > 0 {
                info!("Resolved {} run(s) this cycle", resolved);
            }
        }
    }

    /// Performs a single poll cycle, returning the number of resolved runs
    pub async fn poll_once(&self) -> usize {
        let mut resolved = 0;

        for (run_id, trainingjob_name) in self.pending.snapshot() {
            let state = match self.orchestrator.run_state(&run_id).await {
                Ok(state) => state,
                Err(e) => {
                    warn!("Status query failed for run {}: {}", run_id, e);
                    MANUAL_RECONCILE.to_string()
                }
            };

            if !resolves_pending(&state) {
                debug!("Run {} still {}, keeping", run_id, state);
                continue;
            }

            let notification = RunNotification {
                run_id: run_id.clone(),
                run_status: state,
                trainingjob_name,
            };

            if let Err(e) = self.notifier.notify(&notification).await {
                warn!(
                    "Notification delivery failed for run {}: {:#}",
                    run_id, e
                );
            }

            // Entry goes away regardless of delivery outcome; this is a
            // best-effort notifier, not a reliable-delivery system.
            self.pending.remove(&run_id);
            resolved += 1;
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum FakeState {
        Reported(String),
        QueryFails,
    }

    #[derive(Default)]
    struct FakeStatusSource {
        states: Mutex<HashMap<String, FakeState>>,
    }

    impl FakeStatusSource {
        fn with_state(self, run_id: &str, state: &str) -> Self {
            self.states
                .lock()
                .unwrap()
                .insert(run_id.to_string(), FakeState::Reported(state.to_string()));
            self
        }

        fn with_failing(self, run_id: &str) -> Self {
            self.states
                .lock()
                .unwrap()
                .insert(run_id.to_string(), FakeState::QueryFails);
            self
        }
    }

    #[async_trait]
    impl RunStatusSource for FakeStatusSource {
        async fn run_state(&self, run_id: &str) -> Result<String, ClientError> {
            match self.states.lock().unwrap().get(run_id) {
                Some(FakeState::Reported(state)) => Ok(state.clone()),
                Some(FakeState::QueryFails) | None => {
                    Err(ClientError::api_error(500, "orchestrator unreachable"))
                }
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        delivered: Mutex<Vec<RunNotification>>,
        fail_delivery: bool,
        /// When set, tracks this run in the table during delivery, modeling
        /// a submission racing an in-progress poll cycle.
        track_on_notify: Option<(PendingRuns, String, String)>,
    }

    #[async_trait]
    impl CompletionNotifier for RecordingNotifier {
        async fn notify(&self, notification: &RunNotification) -> Result<()> {
            self.delivered.lock().unwrap().push(notification.clone());

            if let Some((pending, run_id, job)) = &self.track_on_notify {
                pending.track(run_id.clone(), job.clone());
            }

            if self.fail_delivery {
                anyhow::bail!("connection refused");
            }
            Ok(())
        }
    }

    fn reconciler(
        pending: PendingRuns,
        source: FakeStatusSource,
        notifier: Arc<RecordingNotifier>,
    ) -> RunReconciler {
        RunReconciler::new(
            Duration::from_secs(20),
            pending,
            Arc::new(source),
            notifier,
        )
    }

    #[tokio::test]
    async fn test_terminal_run_is_removed_and_notified_once() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let source = FakeStatusSource::default().with_state("run-1", "SUCCEEDED");
        let notifier = Arc::new(RecordingNotifier::default());
        let reconciler = reconciler(pending.clone(), source, notifier.clone());

        assert_eq!(reconciler.poll_once().await, 1);

        assert!(pending.is_empty());
        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(
            delivered[0],
            RunNotification {
                run_id: "run-1".to_string(),
                run_status: "SUCCEEDED".to_string(),
                trainingjob_name: "job-a".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_terminal_run_stays_without_notification() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let source = FakeStatusSource::default().with_state("run-1", "RUNNING");
        let notifier = Arc::new(RecordingNotifier::default());
        let reconciler = reconciler(pending.clone(), source, notifier.clone());

        assert_eq!(reconciler.poll_once().await, 0);

        assert_eq!(pending.len(), 1);
        assert!(notifier.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_notifies_with_sentinel() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let source = FakeStatusSource::default().with_failing("run-1");
        let notifier = Arc::new(RecordingNotifier::default());
        let reconciler = reconciler(pending.clone(), source, notifier.clone());

        assert_eq!(reconciler.poll_once().await, 1);

        assert!(pending.is_empty());
        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].run_status, MANUAL_RECONCILE);
        assert_eq!(delivered[0].trainingjob_name, "job-a");
    }

    #[tokio::test]
    async fn test_failed_delivery_still_removes_entry() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let source = FakeStatusSource::default().with_state("run-1", "FAILED");
        let notifier = Arc::new(RecordingNotifier {
            fail_delivery: true,
            ..Default::default()
        });
        let reconciler = reconciler(pending.clone(), source, notifier.clone());

        assert_eq!(reconciler.poll_once().await, 1);

        // Best effort: delivery was attempted once, entry is gone anyway.
        assert!(pending.is_empty());
        assert_eq!(notifier.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_during_poll_cycle_is_preserved() {
        let pending = PendingRuns::new();
        pending.track("run-1", "job-a");

        let source = FakeStatusSource::default()
            .with_state("run-1", "SUCCEEDED")
            .with_state("run-2", "RUNNING");
        let notifier = Arc::new(RecordingNotifier {
            track_on_notify: Some((pending.clone(), "run-2".to_string(), "job-b".to_string())),
            ..Default::default()
        });
        let reconciler = reconciler(pending.clone(), source, notifier.clone());

        assert_eq!(reconciler.poll_once().await, 1);

        // The run submitted mid-cycle is still tracked and only the resolved
        // run produced a notification.
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.snapshot()[0].0, "run-2");
        assert_eq!(notifier.delivered.lock().unwrap().len(), 1);

        // Next cycle sees it non-terminal and keeps it; no duplicates.
        assert_eq!(reconciler.poll_once().await, 0);
        assert_eq!(pending.len(), 1);
        assert_eq!(notifier.delivered.lock().unwrap().len(), 1);
    }
}
