//! Health states and the report served on `/health/ready`.

use serde::Serialize;

/// Name under which the backend probe is reported.
pub const BACKEND_CHECK_NAME: &str = "backend-connectivity";

/// Binary readiness of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn is_up(self) -> bool {
        self == HealthStatus::Up
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Up => f.write_str("UP"),
            HealthStatus::Down => f.write_str("DOWN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub name: &'static str,
    pub status: HealthStatus,
}

/// Aggregate readiness: down if any check is down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    pub fn from_checks(checks: Vec<HealthCheck>) -> Self {
        let status = if checks.iter().all(|c| c.status.is_up()) {
            HealthStatus::Up
        } else {
            HealthStatus::Down
        };
        Self { status, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_upper_case() {
        let report = HealthReport::from_checks(vec![HealthCheck {
            name: BACKEND_CHECK_NAME,
            status: HealthStatus::Down,
        }]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "DOWN",
                "checks": [{ "name": "backend-connectivity", "status": "DOWN" }]
            })
        );
    }

    #[test]
    fn report_with_no_checks_is_up() {
        assert_eq!(HealthReport::from_checks(vec![]).status, HealthStatus::Up);
    }
}
