//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mend_common::GateError;
use serde::{Deserialize, Serialize};

/// Wire error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable code
    pub error: String,
    /// Human-readable description
    pub message: String,
}

/// Message of an internal error, smuggled through response extensions so
/// the outer middleware can feed the alert engine's error signal path
#[derive(Debug, Clone)]
pub struct InternalErrorMessage(pub String);

/// Gate error carried to the HTTP layer
#[derive(Debug)]
pub struct ApiError(pub GateError);

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            GateError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            GateError::InvalidSubscription(_) => {
                (StatusCode::PAYMENT_REQUIRED, "invalid_subscription")
            }
            GateError::QuotaExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, "quota_exceeded"),
            GateError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            GateError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            GateError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorBody {
            error: code.to_string(),
            message: self.0.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if let GateError::Internal(message) = self.0 {
            response
                .extensions_mut()
                .insert(InternalErrorMessage(message));
        }
        response
    }
}
