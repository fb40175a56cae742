use crate::services::ingestion::BreakerState;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub breaker: BreakerState,
}

/// Health check with the circuit breaker state.
///
/// Reports `degraded` while the breaker is open; the status code stays 200 so the process is
/// not restarted for a downstream outage.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let breaker = state.pipeline.breaker().snapshot();
    let status = if breaker.is_open { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status,
        environment: state.config.environment().to_string(),
        breaker,
    })
}
