//! Training-manager notification
//!
//! Best-effort delivery of run completion notifications. There is no retry
//! and no queue; a failed delivery is logged by the reconciler and the run
//! is dropped from tracking anyway.

use anyhow::Result;
use async_trait::async_trait;
use trellis_core::dto::run::RunNotification;

/// Seam for delivering completion notifications
///
/// The production implementation posts to the training manager; tests swap
/// in a recording fake.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    /// Deliver one notification. Errors mean the delivery failed.
    async fn notify(&self, notification: &RunNotification) -> Result<()>;
}

/// HTTP notifier posting to the training manager's notification endpoint
#[derive(Debug, Clone)]
pub struct TrainingManagerClient {
    url: String,
    client: reqwest::Client,
}

impl TrainingManagerClient {
    /// Creates a notifier for the given notification URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The notification endpoint this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionNotifier for TrainingManagerClient {
    async fn notify(&self, notification: &RunNotification) -> Result<()> {
        tracing::info!(
            "Posting notification for run {} ({}) to training manager",
            notification.run_id,
            notification.run_status
        );

        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("training manager returned status {}", status);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_url() {
        let notifier =
            TrainingManagerClient::new("http://trainingmgr:8100/trainingjob/pipelineNotification");
        assert_eq!(
            notifier.url(),
            "http://trainingmgr:8100/trainingjob/pipelineNotification"
        );
    }
}
