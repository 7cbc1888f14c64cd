//! HTTP 接口层

pub mod controller;
pub mod dto;
pub mod envelope;
pub mod middleware;
pub mod routes;

pub use controller::TransactionController;
pub use dto::*;
pub use envelope::EntityResponse;
pub use routes::{api_routes, transaction_routes};
