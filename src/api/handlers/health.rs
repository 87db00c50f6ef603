//! Health check endpoint for monitoring and readiness checks

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Returns 200 OK while the server is accepting requests. Unauthenticated.
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse { status: "ok".to_string(), version: crate::VERSION.to_string() }),
    )
}
