//! Health check API handler

use axum::Json;

use crate::error::AppError;
use crate::services::health::{self, HealthStatus};

/// GET /health - process liveness probe
///
/// Returns `200 {"status": "ok"}`; an `Unavailable` report from the
/// service maps to `503 {"status": "unavailable", ...}`.
pub async fn health_check() -> Result<Json<HealthStatus>, AppError> {
    let status = health::check_health()?;
    Ok(Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await.expect("health check should succeed");
        assert_eq!(response.0.status, "ok");
    }

    #[tokio::test]
    async fn test_health_check_has_no_observable_state() {
        let first = health_check().await.unwrap();
        let second = health_check().await.unwrap();
        assert_eq!(first.0.status, second.0.status);
    }
}
