//! 数据库行映射结构

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// 交易数据库行
#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub tran_id: String,
    pub amount: Decimal,
    pub transaction_type: i16,
    pub pf_number: i64,
    pub posted_at: DateTime<Utc>,
    pub completed: bool,
    pub version: i64,
}
