//! 实体基础类型

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// 持久化实体的代理主键
///
/// 首次持久化时由存储层分配，之后不再改变。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 实体 trait
pub trait Entity {
    type Id;

    fn id(&self) -> &Self::Id;
}
