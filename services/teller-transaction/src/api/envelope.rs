//! 统一响应信封
//!
//! 八个交易接口无论成败都以 HTTP 200 返回该结构，结果由 `success` 与 `statusCode` 表达。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use teller_errors::AppError;

/// 响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResponse<T> {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
    /// 失败时为 null
    pub entity: Option<T>,
}

impl<T> EntityResponse<T> {
    pub fn ok(message: impl Into<String>, entity: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: StatusCode::OK.as_u16(),
            entity: Some(entity),
        }
    }

    pub fn created(message: impl Into<String>, entity: T) -> Self {
        Self {
            status_code: StatusCode::CREATED.as_u16(),
            ..Self::ok(message, entity)
        }
    }

    /// 超过请求时限
    pub fn timed_out() -> Self {
        Self {
            success: false,
            message: "Request timed out".to_string(),
            status_code: StatusCode::REQUEST_TIMEOUT.as_u16(),
            entity: None,
        }
    }

    /// 失败信封；内部错误只暴露通用提示
    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            message: err.client_message(),
            status_code: err.status_code(),
            entity: None,
        }
    }
}

impl<T: Serialize> IntoResponse for EntityResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
