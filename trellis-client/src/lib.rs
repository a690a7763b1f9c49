//! Trellis orchestrator client
//!
//! A type-safe HTTP client for the ML pipeline orchestrator's REST API
//! (experiments, pipelines, pipeline versions, runs).
//!
//! The orchestrator's wire objects stay private to this crate; every method
//! remaps them into the domain types from `trellis-core`, so the adapter
//! never sees orchestrator field names.
//!
//! # Example
//!
//! ```no_run
//! use trellis_client::OrchestratorClient;
//!
//! # async fn example() -> Result<(), trellis_client::ClientError> {
//! let client = OrchestratorClient::new("http://localhost:8888");
//!
//! let run = client.get_run("run-id").await?;
//! println!("run {} is {}", run.name, run.state);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod experiments;
mod pipelines;
mod runs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use runs::CreateRun;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the orchestrator's REST API
///
/// Methods are organized into logical groups, one impl file per resource:
/// - Experiments (list, lookup by name)
/// - Pipelines (list, lookup, upload, versions, delete)
/// - Runs (submit, status, list, terminate)
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8888")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that carries no body of interest
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OrchestratorClient::new("http://localhost:8888");
        assert_eq!(client.base_url(), "http://localhost:8888");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = OrchestratorClient::new("http://localhost:8888/");
        assert_eq!(client.base_url(), "http://localhost:8888");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = OrchestratorClient::with_client("http://localhost:8888", http_client);
        assert_eq!(client.base_url(), "http://localhost:8888");
    }
}
