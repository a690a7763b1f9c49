//! Trellis Adapter
//!
//! A thin HTTP adapter that translates REST calls into calls against an ML
//! pipeline orchestrator and watches submitted runs in the background.
//!
//! Architecture:
//! - Configuration: loaded once from environment variables and injected
//! - API: axum route handlers remapping orchestrator objects to JSON
//! - Pending table: shared run-id to training-job map behind one mutex
//! - Reconciler: fixed-cadence loop resolving tracked runs and notifying
//!   the training manager (best effort, at-least-once while alive)

mod api;
mod config;
mod notify;
mod pending;
mod reconciler;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::notify::TrainingManagerClient;
use crate::pending::PendingRuns;
use crate::reconciler::RunReconciler;
use trellis_client::OrchestratorClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis_adapter=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Trellis adapter...");

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    info!(
        "Orchestrator at {}, notifying {}",
        config.orchestrator_url(),
        config.notification_url()
    );

    let orchestrator = Arc::new(OrchestratorClient::new(config.orchestrator_url()));
    let notifier = Arc::new(TrainingManagerClient::new(config.notification_url()));
    let pending = PendingRuns::new();

    // Spawn the run-status reconciler; it lives for the process lifetime
    let reconciler = RunReconciler::new(
        config.poll_interval,
        pending.clone(),
        orchestrator.clone(),
        notifier,
    );
    tokio::spawn(reconciler.run());

    // Build router with all API endpoints
    let state = api::AppState {
        config: Arc::new(config.clone()),
        orchestrator,
        pending,
    };
    let app = api::create_router(state);

    let addr = config.bind_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
