//! Error types for the relay server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use message_ledger::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Relay error taxonomy.
///
/// Validation and lookup errors are rejected before any ledger write;
/// gateway errors occur only after the queued record exists.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("User id is not a well-formed identifier")]
    InvalidUserId,

    #[error("Message content cannot be empty")]
    InvalidMessage,

    #[error("User {0} is not registered")]
    UserNotFound(String),

    #[error("User status is not active")]
    UserInactive,

    #[error("Failed to send SMS: {detail}")]
    Gateway { detail: String, simulated: bool },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated: Option<bool>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, code, simulated) = match &self {
            RelayError::InvalidUserId => (StatusCode::BAD_REQUEST, "invalid_user_id", None),
            RelayError::InvalidMessage => (StatusCode::BAD_REQUEST, "invalid_message", None),
            RelayError::UserNotFound(_) => (StatusCode::NOT_FOUND, "user_not_found", None),
            RelayError::UserInactive => (StatusCode::FORBIDDEN, "user_inactive", None),
            RelayError::Gateway { simulated, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "send_error", Some(*simulated))
            }
            RelayError::Store(e) => match e {
                StoreError::AlreadyRegistered => (StatusCode::CONFLICT, "already_registered", None),
                StoreError::InvalidPhoneNumber(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_phone_number", None)
                }
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "server_error", None),
            },
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            simulated,
        };

        (status, Json(body)).into_response()
    }
}
