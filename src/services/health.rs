//! Health reporting service

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Process liveness status, created fresh on every call
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Liveness indicator, `"ok"` when the process is healthy
    pub status: String,
}

/// Report process liveness.
///
/// Returns `ok` unconditionally today; the `Result` keeps the
/// `Unavailable` contract open for future self-checks, which the
/// dispatcher already maps to a 503 response.
pub fn check_health() -> Result<HealthStatus, ServiceError> {
    Ok(HealthStatus {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_ok() {
        let status = check_health().expect("health check should succeed");
        assert_eq!(status.status, "ok");
    }

    #[test]
    fn test_health_status_serializes_to_exact_shape() {
        let status = check_health().unwrap();
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "ok" }));
    }
}
