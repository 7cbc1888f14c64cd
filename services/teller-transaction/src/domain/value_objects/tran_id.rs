//! 业务交易号值对象

use serde::{Deserialize, Serialize};
use teller_common::reference_code;

use crate::error::TransactionError;

/// 交易号最大长度
const MAX_LENGTH: usize = 64;

/// 自动生成交易号的前缀
const GENERATED_PREFIX: &str = "TRN";

/// 业务交易号
///
/// 业务规则:
/// - 去除首尾空白后不能为空
/// - 最大长度 64 字符
/// - 不能包含内部空白或控制字符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TranId(String);

impl TranId {
    pub fn new(value: impl Into<String>) -> Result<Self, TransactionError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(TransactionError::InvalidTranId("must not be blank".to_string()));
        }

        if value.chars().count() > MAX_LENGTH {
            return Err(TransactionError::InvalidTranId(format!(
                "must be at most {MAX_LENGTH} characters"
            )));
        }

        if let Some(c) = value.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(TransactionError::InvalidTranId(format!(
                "contains invalid character {:?}",
                c
            )));
        }

        Ok(Self(value))
    }

    /// 生成新的交易号（TRN + 20 位十六进制）
    pub fn generate() -> Self {
        Self(reference_code(GENERATED_PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for TranId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TranId {
    type Error = TransactionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TranId> for String {
    fn from(value: TranId) -> Self {
        value.0
    }
}
