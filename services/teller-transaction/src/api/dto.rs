//! 请求与响应 DTO

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use teller_domain_core::{Entity, EntityId};
use teller_errors::AppResult;

use crate::application::{CreateTransactionCommand, ModifyTransactionCommand};
use crate::domain::entities::Transaction;
use crate::domain::enums::TransactionType;
use crate::error::TransactionError;

/// create / modify 请求体
///
/// 字段全部可选，缺失项在转换为命令时报告为校验错误。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub id: Option<i64>,
    pub tran_id: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type", alias = "transactionType")]
    pub transaction_type: Option<String>,
    pub pf_number: Option<i64>,
    pub posted_at: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub version: Option<i64>,
}

impl TransactionPayload {
    fn parsed_type(&self) -> AppResult<TransactionType> {
        let raw = self
            .transaction_type
            .as_deref()
            .ok_or(TransactionError::MissingField("type"))?;
        Ok(raw.parse::<TransactionType>()?)
    }

    fn required<T: Copy>(value: Option<T>, field: &'static str) -> AppResult<T> {
        Ok(value.ok_or(TransactionError::MissingField(field))?)
    }

    /// 创建命令；请求体中的 id 与 version 被忽略
    pub fn into_create_command(self) -> AppResult<CreateTransactionCommand> {
        Ok(CreateTransactionCommand {
            transaction_type: self.parsed_type()?,
            amount: Self::required(self.amount, "amount")?,
            pf_number: Self::required(self.pf_number, "pfNumber")?,
            tran_id: self.tran_id,
            posted_at: self.posted_at,
            completed: self.completed.unwrap_or(false),
        })
    }

    pub fn into_modify_command(self) -> AppResult<ModifyTransactionCommand> {
        Ok(ModifyTransactionCommand {
            id: EntityId(Self::required(self.id, "id")?),
            transaction_type: self.parsed_type()?,
            amount: Self::required(self.amount, "amount")?,
            pf_number: Self::required(self.pf_number, "pfNumber")?,
            tran_id: self.tran_id,
            posted_at: self.posted_at,
            completed: self.completed.unwrap_or(false),
            expected_version: self.version,
        })
    }
}

/// 交易响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub tran_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub pf_number: i64,
    pub posted_at: DateTime<Utc>,
    pub completed: bool,
    pub version: i64,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id().value(),
            tran_id: tx.tran_id().to_string(),
            amount: tx.amount().value(),
            transaction_type: tx.transaction_type(),
            pf_number: tx.pf_number().value(),
            posted_at: tx.posted_at(),
            completed: tx.is_completed(),
            version: tx.version(),
        }
    }
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self::from(&tx)
    }
}
