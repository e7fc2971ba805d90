//! Shared HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Maps a domain error to its HTTP response.
///
/// DuplicateBooking and CapacityExceeded are conflicts with current
/// state, not client mistakes, so both land on 409; the capacity
/// rejection keeps its count/capacity detail pair in the body.
pub fn domain_error_response(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::EventNotFound | ErrorCode::BookingNotFound => StatusCode::NOT_FOUND,
        ErrorCode::DuplicateBooking | ErrorCode::CapacityExceeded => StatusCode::CONFLICT,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(code = %error.code, "Request failed: {}", error.message);
    }

    let details = if error.details.is_empty() {
        None
    } else {
        serde_json::to_value(&error.details).ok()
    };

    let body = ErrorResponse {
        code: error.code.to_string(),
        message: error.message,
        details,
    };

    (status, Json(body)).into_response()
}
