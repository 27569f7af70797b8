//! # Health Check Handler
//!
//! Simple endpoint to check if the server is running.
//! Used by load balancers and monitoring systems.

use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
///
/// ## Route
/// GET /health
///
/// ## Response
/// ```json
/// {
///   "status": "healthy",
///   "service": "license-server"
/// }
/// ```
///
/// This handler never fails, so it returns Json<Value> directly instead
/// of AppResult<Json<Value>>.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "license-server"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
    }
}
