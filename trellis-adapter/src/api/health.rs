//! Liveness API Handler
//!
//! Simple liveness probe endpoint for monitoring.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /liveness
/// Liveness probe endpoint
pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "Okay")
}
