//! teller-common - 通用类型和工具库

pub mod health;
pub mod retry;
pub mod utils;

pub use health::*;
pub use retry::*;
pub use utils::*;
