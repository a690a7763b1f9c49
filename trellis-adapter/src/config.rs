//! Adapter configuration
//!
//! Defines all configurable parameters for the adapter: orchestrator
//! connection, training-manager endpoint, listen port, and the run-status
//! polling interval. Constructed once in `main` and passed explicitly to
//! every component that needs it.

use std::time::Duration;

/// Adapter configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hostname or IP of the orchestrator API
    pub orchestrator_host: String,

    /// Port of the orchestrator API
    pub orchestrator_port: u16,

    /// Namespace in which experiments and runs live
    pub namespace: String,

    /// Port the adapter listens on
    pub adapter_port: u16,

    /// Hostname or IP of the training manager
    pub training_manager_host: String,

    /// Port of the training manager
    pub training_manager_port: u16,

    /// How often the reconciler polls tracked runs
    pub poll_interval: Duration,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ORCHESTRATOR_HOST (required)
    /// - ORCHESTRATOR_PORT (required)
    /// - ORCHESTRATOR_NAMESPACE (required)
    /// - ADAPTER_PORT (required)
    /// - TRAINING_MANAGER_HOST (required)
    /// - TRAINING_MANAGER_PORT (required)
    /// - RUN_POLL_INTERVAL (optional, seconds, default: 20)
    pub fn from_env() -> anyhow::Result<Self> {
        let orchestrator_host = require_env("ORCHESTRATOR_HOST")?;
        let orchestrator_port = require_env("ORCHESTRATOR_PORT")?
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ORCHESTRATOR_PORT is not a valid port"))?;
        let namespace = require_env("ORCHESTRATOR_NAMESPACE")?;

        let adapter_port = require_env("ADAPTER_PORT")?
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ADAPTER_PORT is not a valid port"))?;

        let training_manager_host = require_env("TRAINING_MANAGER_HOST")?;
        let training_manager_port = require_env("TRAINING_MANAGER_PORT")?
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("TRAINING_MANAGER_PORT is not a valid port"))?;

        let poll_interval = std::env::var("RUN_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(20));

        Ok(Self {
            orchestrator_host,
            orchestrator_port,
            namespace,
            adapter_port,
            training_manager_host,
            training_manager_port,
            poll_interval,
        })
    }

    /// Base URL of the orchestrator API
    pub fn orchestrator_url(&self) -> String {
        format!("http://{}:{}", self.orchestrator_host, self.orchestrator_port)
    }

    /// Fixed notification endpoint on the training manager
    pub fn notification_url(&self) -> String {
        format!(
            "http://{}:{}/trainingjob/pipelineNotification",
            self.training_manager_host, self.training_manager_port
        )
    }

    /// Address the adapter binds to
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.adapter_port)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.orchestrator_host.is_empty() {
            anyhow::bail!("orchestrator_host cannot be empty");
        }

        if self.namespace.is_empty() {
            anyhow::bail!("namespace cannot be empty");
        }

        if self.training_manager_host.is_empty() {
            anyhow::bail!("training_manager_host cannot be empty");
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} environment variable not set", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            orchestrator_host: "orchestrator".to_string(),
            orchestrator_port: 8888,
            namespace: "pipelines".to_string(),
            adapter_port: 5001,
            training_manager_host: "trainingmgr".to_string(),
            training_manager_port: 8100,
            poll_interval: Duration::from_secs(20),
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.orchestrator_host = String::new();
        assert!(config.validate().is_err());

        config.orchestrator_host = "orchestrator".to_string();
        config.poll_interval = Duration::from_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_urls() {
        let config = test_config();
        assert_eq!(config.orchestrator_url(), "http://orchestrator:8888");
        assert_eq!(
            config.notification_url(),
            "http://trainingmgr:8100/trainingjob/pipelineNotification"
        );
        assert_eq!(config.bind_addr(), "0.0.0.0:5001");
    }
}
