//! 基础设施资源管理
//!
//! 由 bootstrap 按配置统一初始化，服务只通过访问器取用

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use teller_adapter_postgres::{PostgresConfig, PostgresHealthCheck, create_pool};
use teller_auth_core::TokenService;
use teller_common::{HealthCheck, with_retry};
use teller_config::{AppConfig, StorageBackend};
use teller_errors::{AppError, AppResult};
use tracing::info;

/// 访问令牌有效期（秒），本服务只校验不签发
const ACCESS_TOKEN_EXPIRES_IN: i64 = 3600;

/// 基础设施资源容器
pub struct Infrastructure {
    /// 应用配置
    config: AppConfig,
    /// PostgreSQL 连接池（内存后端时为空）
    postgres_pool: Option<PgPool>,
    /// Token 服务（未启用认证时为空）
    token_service: Option<Arc<TokenService>>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（数据库连接带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let postgres_pool = match config.storage.backend {
            StorageBackend::Postgres => {
                let database = config.database.as_ref().ok_or_else(|| {
                    AppError::internal("storage backend is postgres but [database] is missing")
                })?;

                let pg_config = PostgresConfig::new(database.url.expose_secret())
                    .with_max_connections(database.max_connections)
                    .with_application_name(&config.app_name);

                let pool = with_retry(&database.connect_retry, "PostgreSQL connection", || {
                    let cfg = pg_config.clone();
                    async move { create_pool(&cfg).await }
                })
                .await?;
                Some(pool)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage backend");
                None
            }
        };

        let token_service = if config.auth.enabled {
            let secret = config
                .auth
                .jwt_secret
                .as_ref()
                .ok_or_else(|| AppError::internal("auth.enabled requires auth.jwt_secret"))?;
            info!(issuer = %config.auth.issuer, audience = %config.auth.audience, "Bearer token authentication enabled");
            Some(Arc::new(TokenService::new(
                secret.expose_secret(),
                ACCESS_TOKEN_EXPIRES_IN,
                config.auth.issuer.clone(),
                config.auth.audience.clone(),
            )))
        } else {
            None
        };

        Ok(Self {
            config,
            postgres_pool,
            token_service,
        })
    }

    /// 获取配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> Option<PgPool> {
        self.postgres_pool.clone()
    }

    /// 获取 Token 服务
    pub fn token_service(&self) -> Option<Arc<TokenService>> {
        self.token_service.clone()
    }

    /// readiness 检查项
    pub fn health_checks(&self) -> Vec<Arc<dyn HealthCheck>> {
        let mut checks: Vec<Arc<dyn HealthCheck>> = Vec::new();
        if let Some(pool) = &self.postgres_pool {
            checks.push(Arc::new(PostgresHealthCheck::new(pool.clone())));
        }
        checks
    }
}
