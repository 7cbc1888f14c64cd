//! 交易仓储接口

use async_trait::async_trait;
use teller_domain_core::EntityId;
use teller_errors::AppResult;

use crate::domain::entities::Transaction;
use crate::domain::enums::TransactionType;
use crate::domain::value_objects::{PfNumber, TranId};

/// 交易仓储接口
///
/// 所有列表查询按 `id` 升序返回。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// 根据主键查找
    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<Transaction>>;

    /// 根据业务交易号查找
    async fn find_by_tran_id(&self, tran_id: &TranId) -> AppResult<Option<Transaction>>;

    /// 全部交易
    async fn find_all(&self) -> AppResult<Vec<Transaction>>;

    /// 按交易类型过滤
    async fn find_by_type(&self, transaction_type: TransactionType) -> AppResult<Vec<Transaction>>;

    /// 按档案编号过滤
    async fn find_by_pf_number(&self, pf_number: PfNumber) -> AppResult<Vec<Transaction>>;

    /// 检查交易号是否已存在
    async fn exists_by_tran_id(&self, tran_id: &TranId) -> AppResult<bool>;

    /// 保存新交易，交易号重复时返回 Conflict
    async fn insert(&self, transaction: &Transaction) -> AppResult<()>;

    /// 更新交易并返回写入后的状态（版本号已递增）
    ///
    /// `expected_version` 为 `Some` 时，仅当存储中的版本一致才写入，否则返回 Conflict；
    /// 为 `None` 时后写覆盖。记录不存在时返回 NotFound。
    async fn update(
        &self,
        transaction: &Transaction,
        expected_version: Option<i64>,
    ) -> AppResult<Transaction>;
}
