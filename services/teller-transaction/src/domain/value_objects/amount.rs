//! 交易金额值对象

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TransactionError;

/// 交易金额
///
/// 十进制定点数，不允许为负；零金额合法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, TransactionError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(TransactionError::NegativeAmount(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
