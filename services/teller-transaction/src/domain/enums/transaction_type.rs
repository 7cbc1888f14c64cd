//! 交易类型枚举

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransactionError;

/// 交易类型
///
/// 对外以小写字符串表示；入参同时接受 `withdrawal` 作为取款的别名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// 取款
    #[serde(alias = "withdrawal")]
    Withdraw,
    /// 存款
    Deposit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Withdraw => "withdraw",
            TransactionType::Deposit => "deposit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "withdraw" | "withdrawal" => Ok(TransactionType::Withdraw),
            "deposit" => Ok(TransactionType::Deposit),
            _ => Err(TransactionError::UnknownType(s.to_string())),
        }
    }
}

/// 数据库存储编码
impl From<TransactionType> for i16 {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Withdraw => 1,
            TransactionType::Deposit => 2,
        }
    }
}

impl TryFrom<i16> for TransactionType {
    type Error = TransactionError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TransactionType::Withdraw),
            2 => Ok(TransactionType::Deposit),
            other => Err(TransactionError::UnknownType(other.to_string())),
        }
    }
}
