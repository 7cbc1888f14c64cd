//! 交易命令

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use teller_domain_core::EntityId;
use teller_errors::{AppError, AppResult};

use crate::domain::enums::TransactionType;
use crate::domain::value_objects::{Amount, PfNumber, TranId};

/// 创建交易命令
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransactionCommand {
    /// 为空时自动生成
    pub tran_id: Option<String>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub pf_number: i64,
    /// 为空时取当前时间
    pub posted_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// 已校验的创建参数
#[derive(Debug, Clone)]
pub struct ValidatedCreate {
    pub tran_id: TranId,
    pub amount: Amount,
    pub pf_number: PfNumber,
}

impl CreateTransactionCommand {
    pub fn validate(&self) -> AppResult<ValidatedCreate> {
        let tran_id = match &self.tran_id {
            Some(value) => TranId::new(value.as_str())?,
            None => TranId::generate(),
        };

        Ok(ValidatedCreate {
            tran_id,
            amount: Amount::new(self.amount)?,
            pf_number: PfNumber(self.pf_number),
        })
    }
}

/// 修改交易命令（整体替换语义）
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyTransactionCommand {
    pub id: EntityId,
    /// 为空时保留原交易号
    pub tran_id: Option<String>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub pf_number: i64,
    /// 为空时保留原记账时间
    pub posted_at: Option<DateTime<Utc>>,
    pub completed: bool,
    /// 客户端读取时的版本；提供时启用乐观锁
    pub expected_version: Option<i64>,
}

/// 已校验的修改参数
#[derive(Debug, Clone)]
pub struct ValidatedModify {
    pub tran_id: Option<TranId>,
    pub amount: Amount,
    pub pf_number: PfNumber,
}

impl ModifyTransactionCommand {
    pub fn validate(&self) -> AppResult<ValidatedModify> {
        let tran_id = self
            .tran_id
            .as_deref()
            .map(TranId::new)
            .transpose()?;

        if matches!(self.expected_version, Some(version) if version < 1) {
            return Err(AppError::validation("version must be a positive integer"));
        }

        Ok(ValidatedModify {
            tran_id,
            amount: Amount::new(self.amount)?,
            pf_number: PfNumber(self.pf_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(tran_id: Option<&str>, amount: i64) -> CreateTransactionCommand {
        CreateTransactionCommand {
            tran_id: tran_id.map(str::to_string),
            amount: Decimal::new(amount, 2),
            transaction_type: TransactionType::Deposit,
            pf_number: 42,
            posted_at: None,
            completed: false,
        }
    }

    #[test]
    fn test_create_generates_missing_tran_id() {
        let validated = create(None, 100).validate().unwrap();
        assert!(validated.tran_id.as_str().starts_with("TRN"));
    }

    #[test]
    fn test_create_rejects_negative_amount() {
        let err = create(Some("T1"), -1).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_create_rejects_blank_tran_id() {
        let err = create(Some("  "), 100).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_modify_keeps_tran_id_optional() {
        let cmd = ModifyTransactionCommand {
            id: EntityId(1),
            tran_id: None,
            amount: Decimal::ZERO,
            transaction_type: TransactionType::Withdraw,
            pf_number: 1,
            posted_at: None,
            completed: true,
            expected_version: Some(1),
        };
        assert!(cmd.validate().unwrap().tran_id.is_none());
    }
}
