//! teller-bootstrap - 统一服务启动骨架
//!
//! 配置加载、日志初始化、基础设施创建、HTTP 服务启动与优雅关闭

mod health;
mod infrastructure;
mod runtime;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
