//! PostgreSQL 健康检查

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use teller_common::{BaseHealthResult, HealthCheck};

use crate::check_connection;

/// 基于 `SELECT 1` 的连接池健康检查
pub struct PostgresHealthCheck {
    pool: PgPool,
}

impl PostgresHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PostgresHealthCheck {
    fn component_name(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> BaseHealthResult {
        let started = Instant::now();
        match check_connection(&self.pool).await {
            Ok(()) => BaseHealthResult::healthy(started.elapsed().as_millis() as u64),
            Err(e) => {
                tracing::warn!(error = %e, "PostgreSQL health check failed");
                BaseHealthResult::unhealthy("database unreachable")
            }
        }
    }
}
