//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use teller_config::AppConfig;
use teller_errors::AppResult;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::health::{HealthState, health_routes};
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 组装最终的应用路由
///
/// 请求时限只加在健康检查路由上；业务路由自行处理时限，以便按各自的响应格式返回。
/// 合并后统一加上追踪和 CORS。
pub fn build_app(service_routes: Router, health: HealthState, request_timeout: Duration) -> Router {
    service_routes
        .merge(health_routes(health).layer(TimeoutLayer::new(request_timeout)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 运行 HTTP 服务
///
/// 所有服务的统一入口点：
/// 1. 加载配置
/// 2. 初始化运行时（日志）
/// 3. 安装 Prometheus recorder（可选）
/// 4. 创建基础设施资源（数据库、TokenService）
/// 5. 调用闭包构建业务路由
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use teller_bootstrap::run_http;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_http("config", |infra| async move {
///         Ok(my_routes(infra.postgres_pool()))
///     })
///     .await
/// }
/// ```
pub async fn run_http<F, Fut>(
    config_dir: &str,
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. Metrics
    let metrics_handle = if config.telemetry.metrics_enabled {
        match teller_telemetry::init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
                None
            }
        }
    } else {
        None
    };

    // 4. 基础设施
    let infra = Infrastructure::from_config(config.clone()).await?;

    let health = HealthState::new(infra.health_checks()).with_metrics(metrics_handle);

    // 5. 业务路由
    let service_routes = router_builder(infra).await?;

    let app = build_app(
        service_routes,
        health,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    // 6. 启动服务器
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use teller_common::{BaseHealthResult, HealthCheck};
    use tower::ServiceExt;

    struct Stalled;

    #[async_trait]
    impl HealthCheck for Stalled {
        fn component_name(&self) -> &'static str {
            "postgres"
        }

        async fn check(&self) -> BaseHealthResult {
            tokio::time::sleep(Duration::from_secs(2)).await;
            BaseHealthResult::healthy(2000)
        }
    }

    #[tokio::test]
    async fn test_request_deadline_applies_to_health_routes() {
        let health = HealthState::new(vec![Arc::new(Stalled)]);
        let app = build_app(Router::new(), health, Duration::from_millis(20));

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn test_service_routes_keep_their_own_deadline() {
        let routes = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                "done"
            }),
        );
        let app = build_app(routes, HealthState::default(), Duration::from_millis(20));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_routes_are_merged() {
        let app = build_app(Router::new(), HealthState::default(), Duration::from_secs(1));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
