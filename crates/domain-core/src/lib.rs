//! teller-domain-core - 跨服务共享的领域核心类型
//!
//! 实体主键以及主键分配策略

mod entity;
mod id_allocator;

pub use entity::*;
pub use id_allocator::*;
