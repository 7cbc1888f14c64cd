//! 内存交易仓储
//!
//! 用于开发环境与测试；进程退出后数据丢失。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use teller_domain_core::{Entity, EntityId};
use teller_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::entities::Transaction;
use crate::domain::enums::TransactionType;
use crate::domain::repositories::TransactionRepository;
use crate::domain::value_objects::{PfNumber, TranId};
use crate::error::TransactionError;

#[derive(Default)]
struct Store {
    /// 按主键有序，列表查询天然按 id 升序
    rows: BTreeMap<EntityId, Transaction>,
    /// 交易号唯一索引
    tran_ids: HashMap<TranId, EntityId>,
}

impl Store {
    fn select(&self, predicate: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        self.rows.values().filter(|tx| predicate(*tx)).cloned().collect()
    }
}

/// 内存交易仓储
///
/// 唯一性检查与写入在同一把写锁内完成。
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    store: RwLock<Store>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<Transaction>> {
        Ok(self.store.read().await.rows.get(&id).cloned())
    }

    async fn find_by_tran_id(&self, tran_id: &TranId) -> AppResult<Option<Transaction>> {
        let store = self.store.read().await;
        Ok(store
            .tran_ids
            .get(tran_id)
            .and_then(|id| store.rows.get(id))
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Transaction>> {
        Ok(self.store.read().await.select(|_| true))
    }

    async fn find_by_type(&self, transaction_type: TransactionType) -> AppResult<Vec<Transaction>> {
        Ok(self
            .store
            .read()
            .await
            .select(|tx| tx.transaction_type() == transaction_type))
    }

    async fn find_by_pf_number(&self, pf_number: PfNumber) -> AppResult<Vec<Transaction>> {
        Ok(self
            .store
            .read()
            .await
            .select(|tx| tx.pf_number() == pf_number))
    }

    async fn exists_by_tran_id(&self, tran_id: &TranId) -> AppResult<bool> {
        Ok(self.store.read().await.tran_ids.contains_key(tran_id))
    }

    async fn insert(&self, transaction: &Transaction) -> AppResult<()> {
        let mut store = self.store.write().await;
        let id = *transaction.id();

        if store.rows.contains_key(&id) {
            return Err(AppError::conflict(format!("Transaction {} already exists", id)));
        }
        if store.tran_ids.contains_key(transaction.tran_id()) {
            return Err(TransactionError::DuplicateTranId(transaction.tran_id().to_string()).into());
        }

        store.tran_ids.insert(transaction.tran_id().clone(), id);
        store.rows.insert(id, transaction.clone());
        Ok(())
    }

    async fn update(
        &self,
        transaction: &Transaction,
        expected_version: Option<i64>,
    ) -> AppResult<Transaction> {
        let mut store = self.store.write().await;
        let id = *transaction.id();

        let (old_tran_id, actual) = match store.rows.get(&id) {
            Some(current) => (current.tran_id().clone(), current.version()),
            None => return Err(TransactionError::NotFound(id).into()),
        };

        if let Some(expected) = expected_version {
            if expected != actual {
                return Err(TransactionError::VersionConflict {
                    id,
                    expected,
                    actual,
                }
                .into());
            }
        }

        let new_tran_id = transaction.tran_id();
        if *new_tran_id != old_tran_id {
            if store.tran_ids.contains_key(new_tran_id) {
                return Err(TransactionError::DuplicateTranId(new_tran_id.to_string()).into());
            }
            store.tran_ids.remove(&old_tran_id);
            store.tran_ids.insert(new_tran_id.clone(), id);
        }

        let stored = transaction.clone().with_version(actual + 1);
        store.rows.insert(id, stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Amount;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn tx(id: i64, tran_id: &str, transaction_type: TransactionType, pf: i64) -> Transaction {
        Transaction::new(
            EntityId(id),
            TranId::new(tran_id).unwrap(),
            Amount::new(Decimal::new(1000, 2)).unwrap(),
            transaction_type,
            PfNumber(pf),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_lists_are_ordered_by_id() {
        let repo = InMemoryTransactionRepository::new();
        repo.insert(&tx(3, "C", TransactionType::Deposit, 1)).await.unwrap();
        repo.insert(&tx(1, "A", TransactionType::Withdraw, 1)).await.unwrap();
        repo.insert(&tx(2, "B", TransactionType::Deposit, 2)).await.unwrap();

        let ids: Vec<i64> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|t| t.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let deposits = repo.find_by_type(TransactionType::Deposit).await.unwrap();
        assert_eq!(deposits.len(), 2);

        let pf1 = repo.find_by_pf_number(PfNumber(1)).await.unwrap();
        assert_eq!(pf1.len(), 2);
        assert!(repo.find_by_pf_number(PfNumber(9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_tran_id_rejected() {
        let repo = InMemoryTransactionRepository::new();
        repo.insert(&tx(1, "A", TransactionType::Deposit, 1)).await.unwrap();

        let err = repo
            .insert(&tx(2, "A", TransactionType::Deposit, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_reindexes() {
        let repo = InMemoryTransactionRepository::new();
        let original = tx(1, "A", TransactionType::Deposit, 1);
        repo.insert(&original).await.unwrap();

        let renamed = tx(1, "B", TransactionType::Deposit, 1);
        let stored = repo.update(&renamed, Some(1)).await.unwrap();
        assert_eq!(stored.version(), 2);

        assert!(!repo.exists_by_tran_id(&TranId::new("A").unwrap()).await.unwrap());
        let found = repo
            .find_by_tran_id(&TranId::new("B").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.version(), 2);
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let repo = InMemoryTransactionRepository::new();
        let original = tx(1, "A", TransactionType::Deposit, 1);
        repo.insert(&original).await.unwrap();
        repo.update(&original, None).await.unwrap();

        let err = repo.update(&original, Some(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let repo = InMemoryTransactionRepository::new();
        let err = repo
            .update(&tx(7, "A", TransactionType::Deposit, 1), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
