//! 领域实体

mod transaction;

pub use transaction::*;
