//! 领域枚举

mod transaction_type;

pub use transaction_type::*;
