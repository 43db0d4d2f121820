use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Request-time failures and the status each maps to.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("{0}")]
    Validation(String),

    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("failed to read request body: {0}")]
    UnreadableBody(String),

    #[error("answer service failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("answer service returned a link without a url at position {0}")]
    MalformedLink(usize),
}

impl GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) | GatewayError::MalformedLink(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::MalformedJson(_) => "MALFORMED_JSON",
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            GatewayError::UnreadableBody(_) => "UNREADABLE_BODY",
            GatewayError::Upstream(_) | GatewayError::MalformedLink(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Upstream detail is logged by the handler, never returned.
        let message = if status.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.error_code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
