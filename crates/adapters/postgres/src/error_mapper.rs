//! SQLx 错误到 AppError 的映射

use teller_errors::AppError;

/// 将 SQLx 错误转换为 AppError
///
/// 约束冲突映射为 Conflict / Validation，其余归为 Database 或 Internal。
/// 原始错误只保留在 AppError 内部，客户端消息由 AppError 负责脱敏。
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => match db_err.constraint() {
                Some(constraint) => {
                    AppError::conflict(format!("Duplicate value violates {}", constraint))
                }
                None => AppError::conflict("Duplicate entry violates unique constraint"),
            },
            Some("23514") => AppError::validation("Check constraint violation"),
            Some("23502") => AppError::validation("Not null constraint violation"),
            Some("22003") => AppError::validation("Numeric value out of range"),
            Some(code) => AppError::database(format!("Database error ({}): {}", code, db_err)),
            None => AppError::database(db_err.to_string()),
        },
        sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool timeout"),
        sqlx::Error::PoolClosed => AppError::internal("Database connection pool is closed"),
        other => AppError::database(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_pool_timeout() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.is_internal());
    }

    #[test]
    fn test_protocol_error_is_database() {
        let err = map_sqlx_error(sqlx::Error::Protocol("unexpected message".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
