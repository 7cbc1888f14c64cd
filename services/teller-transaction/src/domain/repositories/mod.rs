//! 仓储接口

mod transaction_repository;

pub use transaction_repository::*;
