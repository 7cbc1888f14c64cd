//! 值对象

mod amount;
mod pf_number;
mod tran_id;

pub use amount::*;
pub use pf_number::*;
pub use tran_id::*;
