//! 数据库行到领域对象的转换

use teller_domain_core::EntityId;
use teller_errors::{AppError, AppResult};

use crate::domain::entities::Transaction;
use crate::domain::enums::TransactionType;
use crate::domain::value_objects::{Amount, PfNumber, TranId};

use super::rows::TransactionRow;

/// 将 TransactionRow 转换为 Transaction
///
/// 库中数据违反领域约束时视为内部错误。
pub fn transaction_from_row(row: TransactionRow) -> AppResult<Transaction> {
    let corrupt = |e: crate::error::TransactionError| {
        AppError::internal(format!("Corrupt transaction row {}: {}", row.id, e))
    };

    let transaction_type = TransactionType::try_from(row.transaction_type).map_err(corrupt)?;
    let tran_id = TranId::new(row.tran_id.as_str()).map_err(corrupt)?;
    let amount = Amount::new(row.amount).map_err(corrupt)?;

    Ok(Transaction::new(
        EntityId(row.id),
        tran_id,
        amount,
        transaction_type,
        PfNumber(row.pf_number),
        row.posted_at,
    )
    .with_completed(row.completed)
    .with_version(row.version))
}

pub fn transactions_from_rows(rows: Vec<TransactionRow>) -> AppResult<Vec<Transaction>> {
    rows.into_iter().map(transaction_from_row).collect()
}
