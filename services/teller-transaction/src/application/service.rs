//! 交易应用服务
//!
//! 八个对外操作的业务编排：校验、唯一性检查、主键分配、乐观锁

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use teller_domain_core::{Entity, EntityId, IdAllocator};
use teller_errors::AppResult;
use tracing::{debug, info, warn};

use crate::domain::entities::{Transaction, TransactionChanges};
use crate::domain::enums::TransactionType;
use crate::domain::repositories::TransactionRepository;
use crate::domain::value_objects::{PfNumber, TranId};
use crate::error::TransactionError;

use super::commands::{CreateTransactionCommand, ModifyTransactionCommand};

/// 交易服务接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// 根据主键查询
    async fn find_by_id(&self, id: EntityId) -> AppResult<Transaction>;

    /// 创建交易
    async fn create(&self, cmd: CreateTransactionCommand) -> AppResult<Transaction>;

    /// 修改交易
    async fn modify(&self, cmd: ModifyTransactionCommand) -> AppResult<Transaction>;

    /// 全部交易
    async fn get_all(&self) -> AppResult<Vec<Transaction>>;

    /// 全部取款
    async fn get_withdraws(&self) -> AppResult<Vec<Transaction>>;

    /// 全部存款
    async fn get_deposits(&self) -> AppResult<Vec<Transaction>>;

    /// 根据业务交易号查询
    async fn find_by_tran_id(&self, tran_id: String) -> AppResult<Transaction>;

    /// 根据档案编号查询
    async fn find_by_pf_number(&self, pf_number: i64) -> AppResult<Vec<Transaction>>;
}

/// 交易服务实现
pub struct TransactionServiceImpl {
    repository: Arc<dyn TransactionRepository>,
    id_allocator: Arc<dyn IdAllocator>,
}

impl TransactionServiceImpl {
    pub fn new(
        repository: Arc<dyn TransactionRepository>,
        id_allocator: Arc<dyn IdAllocator>,
    ) -> Self {
        Self {
            repository,
            id_allocator,
        }
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn find_by_id(&self, id: EntityId) -> AppResult<Transaction> {
        debug!(%id, "Finding transaction by id");
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TransactionError::NotFound(id).into())
    }

    async fn create(&self, cmd: CreateTransactionCommand) -> AppResult<Transaction> {
        let validated = cmd.validate()?;

        if self.repository.exists_by_tran_id(&validated.tran_id).await? {
            warn!(tran_id = %validated.tran_id, "Rejected duplicate tranId");
            return Err(TransactionError::DuplicateTranId(validated.tran_id.into_string()).into());
        }

        let id = self.id_allocator.allocate().await?;
        let transaction = Transaction::new(
            id,
            validated.tran_id,
            validated.amount,
            cmd.transaction_type,
            validated.pf_number,
            cmd.posted_at.unwrap_or_else(Utc::now),
        )
        .with_completed(cmd.completed);

        self.repository.insert(&transaction).await?;

        info!(
            %id,
            tran_id = %transaction.tran_id(),
            transaction_type = %transaction.transaction_type(),
            pf_number = %transaction.pf_number(),
            "Transaction created"
        );
        Ok(transaction)
    }

    async fn modify(&self, cmd: ModifyTransactionCommand) -> AppResult<Transaction> {
        let validated = cmd.validate()?;

        let existing = self
            .repository
            .find_by_id(cmd.id)
            .await?
            .ok_or(TransactionError::NotFound(cmd.id))?;

        if let Some(expected) = cmd.expected_version {
            if expected != existing.version() {
                return Err(TransactionError::VersionConflict {
                    id: cmd.id,
                    expected,
                    actual: existing.version(),
                }
                .into());
            }
        }

        if let Some(tran_id) = &validated.tran_id {
            if tran_id != existing.tran_id() && self.repository.exists_by_tran_id(tran_id).await? {
                warn!(id = %cmd.id, %tran_id, "Rejected tranId change to an existing value");
                return Err(TransactionError::DuplicateTranId(tran_id.to_string()).into());
            }
        }

        let replacement = existing.replaced_with(TransactionChanges {
            tran_id: validated.tran_id,
            amount: validated.amount,
            transaction_type: cmd.transaction_type,
            pf_number: validated.pf_number,
            posted_at: cmd.posted_at,
            completed: cmd.completed,
        });

        let stored = self
            .repository
            .update(&replacement, cmd.expected_version)
            .await?;

        info!(
            id = %stored.id(),
            tran_id = %stored.tran_id(),
            version = stored.version(),
            "Transaction modified"
        );
        Ok(stored)
    }

    async fn get_all(&self) -> AppResult<Vec<Transaction>> {
        self.repository.find_all().await
    }

    async fn get_withdraws(&self) -> AppResult<Vec<Transaction>> {
        self.repository.find_by_type(TransactionType::Withdraw).await
    }

    async fn get_deposits(&self) -> AppResult<Vec<Transaction>> {
        self.repository.find_by_type(TransactionType::Deposit).await
    }

    async fn find_by_tran_id(&self, tran_id: String) -> AppResult<Transaction> {
        // 格式不合法的交易号不可能存在
        let Ok(key) = TranId::new(tran_id.as_str()) else {
            return Err(TransactionError::TranIdNotFound(tran_id).into());
        };

        self.repository
            .find_by_tran_id(&key)
            .await?
            .ok_or_else(|| TransactionError::TranIdNotFound(tran_id).into())
    }

    async fn find_by_pf_number(&self, pf_number: i64) -> AppResult<Vec<Transaction>> {
        self.repository
            .find_by_pf_number(PfNumber(pf_number))
            .await
    }
}
