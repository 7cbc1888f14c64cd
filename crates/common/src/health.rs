//! 通用健康检查模块
//!
//! 提供健康检查 trait 和聚合结果类型

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;

/// 单个组件的健康检查结果
#[derive(Debug, Clone, Serialize)]
pub struct BaseHealthResult {
    /// 是否健康
    pub healthy: bool,
    /// 延迟（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// 错误信息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BaseHealthResult {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            healthy: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            latency_ms: None,
            error: Some(error.into()),
        }
    }

    pub fn timeout() -> Self {
        Self::unhealthy("Health check timed out")
    }
}

/// 健康检查 trait
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// 组件名称
    fn component_name(&self) -> &'static str;

    /// 执行检查
    async fn check(&self) -> BaseHealthResult;
}

/// 带超时地执行一次检查
pub async fn run_check(check: &dyn HealthCheck, timeout: Duration) -> BaseHealthResult {
    let started = Instant::now();
    match tokio::time::timeout(timeout, check.check()).await {
        Ok(mut result) => {
            if result.healthy && result.latency_ms.is_none() {
                result.latency_ms = Some(started.elapsed().as_millis() as u64);
            }
            result
        }
        Err(_) => BaseHealthResult::timeout(),
    }
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    #[serde(flatten)]
    pub result: BaseHealthResult,
}

/// 聚合健康检查结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedHealthResult {
    pub healthy: bool,
    pub components: Vec<ComponentHealth>,
}

impl AggregatedHealthResult {
    pub fn new() -> Self {
        Self {
            healthy: true,
            components: Vec::new(),
        }
    }

    pub fn add_component(&mut self, name: impl Into<String>, result: BaseHealthResult) {
        if !result.healthy {
            self.healthy = false;
        }
        self.components.push(ComponentHealth {
            name: name.into(),
            result,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow;

    #[async_trait]
    impl HealthCheck for Slow {
        fn component_name(&self) -> &'static str {
            "slow"
        }

        async fn check(&self) -> BaseHealthResult {
            tokio::time::sleep(Duration::from_secs(10)).await;
            BaseHealthResult::healthy(0)
        }
    }

    #[test]
    fn test_aggregate_marks_unhealthy() {
        let mut agg = AggregatedHealthResult::new();
        agg.add_component("storage", BaseHealthResult::healthy(3));
        assert!(agg.healthy);

        agg.add_component("cache", BaseHealthResult::unhealthy("down"));
        assert!(!agg.healthy);
        assert_eq!(agg.components.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_check_times_out() {
        let result = run_check(&Slow, Duration::from_millis(50)).await;
        assert!(!result.healthy);
        assert_eq!(result.error.as_deref(), Some("Health check timed out"));
    }
}
