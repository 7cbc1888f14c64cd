//! teller-errors - 统一错误处理
//!
//! 所有层共享的错误分类。对外暴露时只使用 [`AppError::client_message`]，
//! 内部错误细节只进入日志。

use serde::Serialize;
use thiserror::Error;

/// 对客户端隐藏内部细节时使用的统一消息
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 应用错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// 错误类别（用于日志字段和 metrics 标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 错误类别，数据库错误归入 Internal
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) | Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// 是否为服务端错误
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// 可以返回给客户端的消息
    ///
    /// 4xx 类错误返回原始描述，内部错误和数据库错误统一替换为
    /// [`INTERNAL_ERROR_MESSAGE`]。
    pub fn client_message(&self) -> String {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Internal(_) | Self::Database(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::unauthorized("x").status_code(), 401);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::internal("x").status_code(), 500);
        assert_eq!(AppError::database("x").status_code(), 500);
    }

    #[test]
    fn test_client_message_hides_internal_detail() {
        let err = AppError::database("relation \"transactions\" does not exist");
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.is_internal());

        let err = AppError::internal("pool closed");
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_client_message_keeps_user_facing_detail() {
        let err = AppError::not_found("Transaction with id 7 not found");
        assert_eq!(err.client_message(), "Transaction with id 7 not found");
        assert_eq!(err.to_string(), "Not found: Transaction with id 7 not found");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
        assert_eq!(ErrorKind::Conflict.as_str(), "conflict");
    }
}
