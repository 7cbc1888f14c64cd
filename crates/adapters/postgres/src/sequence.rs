//! 基于 PostgreSQL 序列的主键分配

use async_trait::async_trait;
use sqlx::PgPool;
use teller_domain_core::{EntityId, IdAllocator};
use teller_errors::AppResult;

use crate::map_sqlx_error;

/// 通过 `nextval` 从数据库序列分配主键
///
/// 序列值在事务回滚后也不会复用，因此只保证唯一。
pub struct SequenceIdAllocator {
    pool: PgPool,
    sequence: String,
}

impl SequenceIdAllocator {
    pub fn new(pool: PgPool, sequence: impl Into<String>) -> Self {
        Self {
            pool,
            sequence: sequence.into(),
        }
    }
}

#[async_trait]
impl IdAllocator for SequenceIdAllocator {
    async fn allocate(&self) -> AppResult<EntityId> {
        // 序列名作为参数传入 regclass，避免拼接 SQL
        let (id,): (i64,) = sqlx::query_as("SELECT nextval($1::regclass)")
            .bind(&self.sequence)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(EntityId(id))
    }
}
