//! API Error Handling
//!
//! Unified error types and conversion for API responses. Client-input
//! errors carry a `{status, message, payload}` envelope; orchestrator
//! failures surface as an opaque 500 with the detail logged only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use trellis_client::ClientError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        message: String,
        payload: Option<serde_json::Value>,
    },
    NotImplemented(String),
    Upstream(ClientError),
}

impl ApiError {
    /// Client-input error without diagnostic payload
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            payload: None,
        }
    }

    /// Client-input error with a diagnostic payload echoed back
    pub fn bad_request_with_payload(
        message: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, payload) = match self {
            ApiError::BadRequest { message, payload } => {
                (StatusCode::BAD_REQUEST, message, payload)
            }
            ApiError::NotImplemented(message) => (StatusCode::NOT_IMPLEMENTED, message, None),
            ApiError::Upstream(err) => {
                tracing::error!("Orchestrator error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error from orchestrator".to_string(),
                    None,
                )
            }
        };

        let body = serde_json::json!({
            "status": status.as_u16(),
            "message": message,
            "payload": payload,
        });

        (status, Json(body)).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::Upstream(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::bad_request("Less arguments").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_is_opaque_500() {
        let response = ApiError::Upstream(ClientError::api_error(503, "boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_implemented_status() {
        let response = ApiError::NotImplemented("Method not supported yet".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
