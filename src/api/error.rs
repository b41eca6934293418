use crate::services::pairing::PairingError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// JSON body of every error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<PairingError> for AppError {
    fn from(err: PairingError) -> Self {
        match err {
            PairingError::MissingInput
            | PairingError::MissingFilePart
            | PairingError::EmptyFilename
            | PairingError::DisallowedExtension => AppError::BadRequest(err.to_string()),
            PairingError::NotFound => AppError::NotFound(err.to_string()),
            PairingError::Malformed(msg) => AppError::BadRequest(msg),
            PairingError::PayloadTooLarge => AppError::PayloadTooLarge(err.to_string()),
            PairingError::Storage(e) => AppError::Anyhow(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(PairingError::PayloadTooLarge.to_string())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(e) => {
                tracing::error!("Anyhow error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_error_status() {
        let cases = [
            (PairingError::MissingInput, StatusCode::BAD_REQUEST),
            (PairingError::NotFound, StatusCode::NOT_FOUND),
            (PairingError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (
                PairingError::Malformed("bad boundary".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PairingError::Storage(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_messages_match_pairing_errors() {
        let AppError::NotFound(msg) = AppError::from(PairingError::NotFound) else {
            panic!("expected NotFound");
        };
        assert_eq!(msg, "File not found");

        let AppError::BadRequest(msg) = AppError::from(PairingError::MissingInput) else {
            panic!("expected BadRequest");
        };
        assert_eq!(msg, "No filename provided");
    }
}
