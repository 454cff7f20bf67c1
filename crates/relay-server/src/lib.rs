//! HTTP boundary for the chat relay.
//!
//! Exposes the relay over axum: streamed and buffered chat endpoints, a health
//! probe, CORS and per-request tracing. The binary in `main.rs` only wires
//! configuration, logging and shutdown around [`routes::build`].

pub mod args;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use error::ApiError;
pub use routes::{MODEL_HEADER, build};
pub use state::AppState;
