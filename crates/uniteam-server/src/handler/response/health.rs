//! Health response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uniteam_postgres::PgPoolStatus;

/// Overall service condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum HealthStatus {
    Healthy,
    /// Requests are queueing for database connections.
    Degraded,
}

/// Connection pool counters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolHealth {
    pub max_size: usize,
    pub size: usize,
    pub available: usize,
    pub waiting: usize,
}

/// Liveness report.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: HealthStatus,
    /// Application version.
    pub version: String,
    pub database: PoolHealth,
    pub checked_at: Timestamp,
}

impl Health {
    pub fn from_pool_status(pool: PgPoolStatus) -> Self {
        let status = if pool.is_under_pressure() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION").to_owned(),
            database: PoolHealth {
                max_size: pool.max_size,
                size: pool.size,
                available: pool.available,
                waiting: pool.waiting,
            },
            checked_at: Timestamp::now(),
        }
    }
}
