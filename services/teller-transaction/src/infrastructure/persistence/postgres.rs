//! PostgreSQL 交易仓储

use async_trait::async_trait;
use sqlx::PgPool;
use teller_adapter_postgres::map_sqlx_error;
use teller_domain_core::{Entity, EntityId};
use teller_errors::{AppError, AppResult};
use tracing::debug;

use crate::domain::entities::Transaction;
use crate::domain::enums::TransactionType;
use crate::domain::repositories::TransactionRepository;
use crate::domain::value_objects::{PfNumber, TranId};
use crate::error::TransactionError;

use super::converters::{transaction_from_row, transactions_from_rows};
use super::rows::TransactionRow;

const SELECT_COLUMNS: &str =
    "SELECT id, tran_id, amount, transaction_type, pf_number, posted_at, completed, version FROM transactions";

/// PostgreSQL 交易仓储
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 唯一约束冲突只可能来自交易号
    fn map_write_error(e: sqlx::Error, tran_id: &TranId) -> AppError {
        match map_sqlx_error(e) {
            AppError::Conflict(_) => TransactionError::DuplicateTranId(tran_id.to_string()).into(),
            other => other,
        }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(transaction_from_row).transpose()
    }

    async fn find_by_tran_id(&self, tran_id: &TranId) -> AppResult<Option<Transaction>> {
        let row =
            sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_COLUMNS} WHERE tran_id = $1"))
                .bind(tran_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(transaction_from_row).transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        transactions_from_rows(rows)
    }

    async fn find_by_type(&self, transaction_type: TransactionType) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "{SELECT_COLUMNS} WHERE transaction_type = $1 ORDER BY id"
        ))
        .bind(i16::from(transaction_type))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        transactions_from_rows(rows)
    }

    async fn find_by_pf_number(&self, pf_number: PfNumber) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "{SELECT_COLUMNS} WHERE pf_number = $1 ORDER BY id"
        ))
        .bind(pf_number.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        transactions_from_rows(rows)
    }

    async fn exists_by_tran_id(&self, tran_id: &TranId) -> AppResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM transactions WHERE tran_id = $1)")
                .bind(tran_id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn insert(&self, transaction: &Transaction) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, tran_id, amount, transaction_type, pf_number, posted_at, completed, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(transaction.id().value())
        .bind(transaction.tran_id().as_str())
        .bind(transaction.amount().value())
        .bind(i16::from(transaction.transaction_type()))
        .bind(transaction.pf_number().value())
        .bind(transaction.posted_at())
        .bind(transaction.is_completed())
        .bind(transaction.version())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, transaction.tran_id()))?;

        debug!(id = %transaction.id(), "Transaction row inserted");
        Ok(())
    }

    async fn update(
        &self,
        transaction: &Transaction,
        expected_version: Option<i64>,
    ) -> AppResult<Transaction> {
        let id = *transaction.id();

        // 版本条件与递增在同一条语句内完成
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions SET
                tran_id = $2,
                amount = $3,
                transaction_type = $4,
                pf_number = $5,
                posted_at = $6,
                completed = $7,
                version = version + 1
            WHERE id = $1 AND ($8::BIGINT IS NULL OR version = $8)
            RETURNING id, tran_id, amount, transaction_type, pf_number, posted_at, completed, version
            "#,
        )
        .bind(id.value())
        .bind(transaction.tran_id().as_str())
        .bind(transaction.amount().value())
        .bind(i16::from(transaction.transaction_type()))
        .bind(transaction.pf_number().value())
        .bind(transaction.posted_at())
        .bind(transaction.is_completed())
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, transaction.tran_id()))?;

        if let Some(row) = row {
            debug!(%id, version = row.version, "Transaction row updated");
            return transaction_from_row(row);
        }

        // 未命中：区分记录不存在与版本不一致
        let current: Option<(i64,)> = sqlx::query_as("SELECT version FROM transactions WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match (current, expected_version) {
            (Some((actual,)), Some(expected)) => Err(TransactionError::VersionConflict {
                id,
                expected,
                actual,
            }
            .into()),
            _ => Err(TransactionError::NotFound(id).into()),
        }
    }
}
