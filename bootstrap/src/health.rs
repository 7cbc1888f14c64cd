//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use teller_common::{AggregatedHealthResult, HealthCheck, run_check};

/// 单项检查的超时时间
const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// 健康检查路由状态
#[derive(Clone, Default)]
pub struct HealthState {
    checks: Vec<Arc<dyn HealthCheck>>,
    metrics: Option<PrometheusHandle>,
}

impl HealthState {
    pub fn new(checks: Vec<Arc<dyn HealthCheck>>) -> Self {
        Self {
            checks,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// 执行所有 readiness 检查
    pub async fn readiness(&self) -> AggregatedHealthResult {
        let mut result = AggregatedHealthResult::new();
        for check in &self.checks {
            let outcome = run_check(check.as_ref(), CHECK_TIMEOUT).await;
            result.add_component(check.component_name(), outcome);
        }
        result
    }
}

#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// 健康检查路由
pub fn health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Liveness 端点处理器
async fn health_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness 端点处理器
async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let result = state.readiness().await;
    let code = if result.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(result))
}

/// Metrics 端点处理器
async fn metrics_handler(State(state): State<HealthState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [("content-type", "text/plain; charset=utf-8")],
            "metrics disabled".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use teller_common::BaseHealthResult;
    use tower::ServiceExt;

    struct Failing;

    #[async_trait]
    impl HealthCheck for Failing {
        fn component_name(&self) -> &'static str {
            "postgres"
        }

        async fn check(&self) -> BaseHealthResult {
            BaseHealthResult::unhealthy("database unreachable")
        }
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_liveness_always_ok() {
        let app = health_routes(HealthState::new(vec![Arc::new(Failing)]));
        assert_eq!(get_status(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_checks_is_ok() {
        let app = health_routes(HealthState::default());
        assert_eq!(get_status(app, "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reports_failing_component() {
        let app = health_routes(HealthState::new(vec![Arc::new(Failing)]));
        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["healthy"], false);
        assert_eq!(json["components"][0]["name"], "postgres");
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let app = health_routes(HealthState::default());
        assert_eq!(get_status(app, "/metrics").await, StatusCode::NOT_FOUND);
    }
}
