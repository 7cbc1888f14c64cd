//! 交易实体

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use teller_domain_core::{Entity, EntityId};

use crate::domain::enums::TransactionType;
use crate::domain::value_objects::{Amount, PfNumber, TranId};

/// 首次持久化时的版本号
pub const INITIAL_VERSION: i64 = 1;

/// 记账时间保留的小数秒位数（与 TIMESTAMPTZ 的微秒精度一致）
const POSTED_AT_SUBSEC_DIGITS: u16 = 6;

fn storage_precision(posted_at: DateTime<Utc>) -> DateTime<Utc> {
    posted_at.trunc_subsecs(POSTED_AT_SUBSEC_DIGITS)
}

/// 交易实体
///
/// 柜员录入的一笔存款或取款。`id` 由存储层分配，`version` 每次修改递增。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// 代理主键
    id: EntityId,
    /// 业务交易号（全局唯一）
    tran_id: TranId,
    /// 金额
    amount: Amount,
    /// 交易类型
    transaction_type: TransactionType,
    /// 档案编号
    pf_number: PfNumber,
    /// 记账时间
    posted_at: DateTime<Utc>,
    /// 是否已完成
    completed: bool,
    /// 乐观锁版本
    version: i64,
}

/// 修改交易时可替换的字段
#[derive(Debug, Clone)]
pub struct TransactionChanges {
    pub tran_id: Option<TranId>,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub pf_number: PfNumber,
    pub posted_at: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl Transaction {
    /// 创建新交易（尚未持久化的版本号为初始值）
    ///
    /// 记账时间截断到微秒，保证写入后读回的记录与返回值一致。
    pub fn new(
        id: EntityId,
        tran_id: TranId,
        amount: Amount,
        transaction_type: TransactionType,
        pf_number: PfNumber,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tran_id,
            amount,
            transaction_type,
            pf_number,
            posted_at: storage_precision(posted_at),
            completed: false,
            version: INITIAL_VERSION,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// 以修改内容替换当前状态
    ///
    /// 未提供的交易号和记账时间保留原值；`id` 与 `version` 不变，
    /// 版本号由存储层在写入时递增。
    pub fn replaced_with(&self, changes: TransactionChanges) -> Self {
        Self {
            id: self.id,
            tran_id: changes.tran_id.unwrap_or_else(|| self.tran_id.clone()),
            amount: changes.amount,
            transaction_type: changes.transaction_type,
            pf_number: changes.pf_number,
            posted_at: changes
                .posted_at
                .map(storage_precision)
                .unwrap_or(self.posted_at),
            completed: changes.completed,
            version: self.version,
        }
    }

    // ========== Getters ==========

    pub fn tran_id(&self) -> &TranId {
        &self.tran_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn pf_number(&self) -> PfNumber {
        self.pf_number
    }

    pub fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn version(&self) -> i64 {
        self.version
    }
}

impl Entity for Transaction {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Transaction {
        Transaction::new(
            EntityId(1),
            TranId::new("T100").unwrap(),
            Amount::new(Decimal::new(5000, 2)).unwrap(),
            TransactionType::Deposit,
            PfNumber(42),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_transaction_defaults() {
        let tx = sample();
        assert_eq!(tx.version(), INITIAL_VERSION);
        assert!(!tx.is_completed());
        assert_eq!(tx.id(), &EntityId(1));
    }

    #[test]
    fn test_posted_at_truncated_to_micros() {
        let posted_at = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let tx = Transaction::new(
            EntityId(1),
            TranId::new("T100").unwrap(),
            Amount::new(Decimal::ONE).unwrap(),
            TransactionType::Deposit,
            PfNumber(42),
            posted_at,
        );
        assert_eq!(tx.posted_at().timestamp_subsec_nanos(), 123_456_000);

        let changed = tx.replaced_with(TransactionChanges {
            tran_id: None,
            amount: tx.amount(),
            transaction_type: tx.transaction_type(),
            pf_number: tx.pf_number(),
            posted_at: Some(DateTime::from_timestamp(1_700_000_100, 999_999_999).unwrap()),
            completed: false,
        });
        assert_eq!(changed.posted_at().timestamp_subsec_nanos(), 999_999_000);
    }

    #[test]
    fn test_replace_keeps_omitted_fields() {
        let tx = sample();
        let changed = tx.replaced_with(TransactionChanges {
            tran_id: None,
            amount: Amount::new(Decimal::new(7500, 2)).unwrap(),
            transaction_type: TransactionType::Withdraw,
            pf_number: PfNumber(43),
            posted_at: None,
            completed: true,
        });

        assert_eq!(changed.id(), tx.id());
        assert_eq!(changed.tran_id(), tx.tran_id());
        assert_eq!(changed.posted_at(), tx.posted_at());
        assert_eq!(changed.version(), tx.version());
        assert_eq!(changed.transaction_type(), TransactionType::Withdraw);
        assert_eq!(changed.pf_number(), PfNumber(43));
        assert!(changed.is_completed());
    }
}
