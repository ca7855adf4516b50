//! Service liveness endpoint
//!
//! Reports whether the Promptroute process itself is up. Per-provider health
//! lives at /status; this endpoint exists for load balancers and monitors in
//! front of the service.

use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
}

/// GET /health handler
///
/// Returns 200 OK whenever the process is serving requests.
pub async fn handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "OK" }))
}
