// src/error.rs
// Centralized error handling for the advisor service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Service error taxonomy.
///
/// Collaborator *format* problems (NLU returning prose instead of JSON,
/// missing fields) are not represented here: they are recovered where they
/// occur by degrading to an empty extraction. Only conditions the front door
/// must surface become a `TellerError`.
#[derive(Error, Debug)]
pub enum TellerError {
    #[error("product store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("language service rate limited, retry in {retry_after_secs}s")]
    NluBusy { retry_after_secs: u64 },

    #[error("language service unreachable: {0}")]
    NluUnreachable(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type TellerResult<T> = Result<T, TellerError>;

impl TellerError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// User-facing message. Collaborator outages get a polite retry line
    /// instead of leaking transport details.
    pub fn user_message(&self) -> String {
        match self {
            Self::NluBusy { retry_after_secs } => format!(
                "The recommendation service is briefly over capacity. Please try again in about {} minutes.",
                (retry_after_secs / 60).max(1)
            ),
            Self::NluUnreachable(_) => {
                "The recommendation service is temporarily unreachable. Please try again in a moment.".to_string()
            }
            Self::Store(_) => "Something went wrong on our side. Please try again.".to_string(),
            Self::InvalidRequest(msg) => msg.clone(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NluBusy { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NluUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for TellerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }

        let body = json!({
            "error": true,
            "message": self.user_message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_maps_to_429_with_wait_hint() {
        let err = TellerError::NluBusy {
            retry_after_secs: 300,
        };
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert!(err.user_message().contains("5 minutes"));
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let err = TellerError::Store(sqlx::Error::PoolClosed);
        assert!(!err.user_message().contains("pool"));
    }
}
