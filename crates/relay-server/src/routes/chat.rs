//! Chat routes.

use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use relay_core::{ConversationRequest, RelayError};
use serde::Serialize;
use tracing::{info, warn};

use super::MODEL_HEADER;
use crate::error::ApiError;
use crate::state::AppState;

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct ReplyBody {
    pub reply: String,
    pub model: String,
}

/// Streamed reply (`POST /`, `POST /api/chat`).
///
/// The body is the concatenation of the selected model's chunks. If the
/// upstream fails after streaming started, the body ends with an error so the
/// client sees the truncation, or with an `[Error: ...]` marker when
/// `stream_error_marker` is enabled.
pub async fn stream_reply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let stream = state.relay.handle_chat(&request).await?;
    info!(model = %stream.model, "streaming reply");

    let error_marker = state.config.stream_error_marker;
    let body = stream.chunks.map(move |item| match item {
        Ok(text) => Ok(Bytes::from(text)),
        Err(e) if error_marker => {
            warn!(error = %e, "stream failed, appending error marker");
            Ok(Bytes::from(format!("\n[Error: {}]", e)))
        }
        Err(e) => Err::<Bytes, RelayError>(e),
    });

    let mut response = Body::from_stream(body).into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
    match HeaderValue::from_str(&stream.model) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(MODEL_HEADER), value);
        }
        Err(e) => warn!(model = %stream.model, error = %e, "model name is not a valid header value"),
    }

    Ok(response)
}

/// Buffered reply (`POST /api/reply`).
pub async fn buffered_reply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConversationRequest>, JsonRejection>,
) -> Result<Json<ReplyBody>, ApiError> {
    let Json(request) = payload?;
    let reply = state.relay.handle_chat_buffered(&request).await?;
    info!(model = %reply.model, chars = reply.content.chars().count(), "buffered reply");

    Ok(Json(ReplyBody {
        reply: reply.content,
        model: reply.model,
    }))
}
