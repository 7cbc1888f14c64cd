//! 交易服务错误
//!
//! 领域错误在服务边界统一转换为 `AppError`

use teller_domain_core::EntityId;
use teller_errors::AppError;
use thiserror::Error;

/// 交易领域错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("Transaction {0} not found")]
    NotFound(EntityId),

    #[error("Transaction with tranId '{0}' not found")]
    TranIdNotFound(String),

    #[error("Transaction with tranId '{0}' already exists")]
    DuplicateTranId(String),

    #[error("Transaction {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        id: EntityId,
        expected: i64,
        actual: i64,
    },

    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Unknown transaction type '{0}', expected 'withdraw' or 'deposit'")]
    UnknownType(String),

    #[error("Invalid tranId: {0}")]
    InvalidTranId(String),

    #[error("Amount must not be negative, got {0}")]
    NegativeAmount(rust_decimal::Decimal),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        let message = err.to_string();
        match err {
            TransactionError::NotFound(_) | TransactionError::TranIdNotFound(_) => {
                AppError::not_found(message)
            }
            TransactionError::DuplicateTranId(_) | TransactionError::VersionConflict { .. } => {
                AppError::conflict(message)
            }
            TransactionError::MissingField(_)
            | TransactionError::UnknownType(_)
            | TransactionError::InvalidTranId(_)
            | TransactionError::NegativeAmount(_) => AppError::validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_app_error_kinds() {
        let err: AppError = TransactionError::NotFound(EntityId(7)).into();
        assert_eq!(err, AppError::not_found("Transaction 7 not found"));

        let err: AppError = TransactionError::DuplicateTranId("T1".into()).into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = TransactionError::VersionConflict {
            id: EntityId(1),
            expected: 1,
            actual: 2,
        }
        .into();
        assert_eq!(err.status_code(), 409);

        let err: AppError = TransactionError::MissingField("id").into();
        assert_eq!(err.client_message(), "Field 'id' is required");
    }
}
