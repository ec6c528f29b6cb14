// src/server/error.rs
// HTTP error responses: every failure is rendered as {"error": "<message>"}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::warn;

use crate::error::RiskError;

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

// Prediction failures are all reported to the client as bad requests.
impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = self.status_code.as_u16(), error = %self.message, "Request failed");
        (self.status_code, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::bad_request("boom").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "boom" }));
    }

    #[test]
    fn test_from_risk_error_is_bad_request() {
        let err: ApiError = RiskError::InvalidInput("x".to_string()).into();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("invalid input"));
    }
}
