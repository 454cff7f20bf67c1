//! Axum router construction.
//!
//! [`build`] assembles the application router:
//! - `POST /` and `POST /api/chat`: streamed plain-text reply
//! - `POST /api/reply`: buffered JSON reply
//! - `GET /health`: liveness and configured models
//!
//! wrapped in CORS and per-request tracing layers.

mod chat;
mod health;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Response header naming the model that produced a streamed reply.
pub const MODEL_HEADER: &str = "x-relay-model";

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let cors = cors::cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", post(chat::stream_reply))
        .route("/api/chat", post(chat::stream_reply))
        .route("/api/reply", post(chat::buffered_reply))
        .route("/health", get(health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(trace::request_span))
        .with_state(state)
}
