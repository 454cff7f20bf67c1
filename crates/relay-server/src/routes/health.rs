use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
    pub models: Vec<String>,
}

/// Liveness probe (`GET /health`).
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        models: state
            .config
            .models
            .iter()
            .map(|m| m.identifier.clone())
            .collect(),
    })
}
