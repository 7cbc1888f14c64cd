//! 客户档案编号（PF 号）

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 交易所属客户/账户档案编号
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PfNumber(pub i64);

impl PfNumber {
    pub fn value(&self) -> i64 {
        self.0
    }
}
