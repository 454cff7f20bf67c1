//! HTTP error responses.
//!
//! Handlers return `Result<T, ApiError>`. Every error becomes a JSON body of
//! the form `{"error": "...", "detail": "..."}` where `detail` is optional.
//! Configuration and internal failures are logged in full but only a generic
//! message is returned, so credentials and file paths never reach a client.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_core::RelayError;
use relay_core::llm::upstream::describe_error_body;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// All errors surfaced by the relay's HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Propagated from the relay.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The request body was not valid JSON for the endpoint.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        let relay_error = match self {
            ApiError::BadRequest(message) => {
                return (
                    StatusCode::BAD_REQUEST,
                    "Invalid request body".to_owned(),
                    Some(message.clone()),
                );
            }
            ApiError::Relay(e) => e,
        };

        match relay_error {
            RelayError::InvalidRequest { message } => {
                (StatusCode::BAD_REQUEST, message.clone(), None)
            }
            RelayError::Configuration { .. } => {
                error!(code = relay_error.error_code(), error = %relay_error, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_owned(),
                    None,
                )
            }
            RelayError::UpstreamClient {
                model,
                status,
                body,
            } => (
                upstream_status(*status),
                format!("Upstream rejected the request for model '{}'", model),
                Some(describe_error_body(body)),
            ),
            RelayError::AllModelsUnavailable { last_error, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "All models are currently unavailable".to_owned(),
                Some(last_error.clone()),
            ),
            RelayError::UpstreamResponse { model, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unusable response from model '{}'", model),
                Some(message.clone()),
            ),
            RelayError::MidStream { .. } | RelayError::Io { .. } | RelayError::Json { .. } => {
                error!(code = relay_error.error_code(), error = %relay_error, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                    None,
                )
            }
        }
    }
}

/// Pass error statuses through verbatim; anything else is a bad gateway.
fn upstream_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if code.is_client_error() || code.is_server_error() => code,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = self.parts();
        (status, Json(ErrorBody { error, detail })).into_response()
    }
}
