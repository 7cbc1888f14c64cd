//! teller-transaction - 柜员交易服务
//!
//! 存款/取款交易的录入、修改与查询

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use teller_auth_core::TokenService;

use api::{TransactionController, api_routes};
use application::{TransactionService, TransactionServiceImpl};
use infrastructure::Storage;

/// 由存储后端装配服务并生成业务路由
pub fn build_router(
    storage: Storage,
    token_service: Option<Arc<TokenService>>,
    request_timeout: Duration,
) -> Router {
    let service: Arc<dyn TransactionService> = Arc::new(TransactionServiceImpl::new(
        storage.repository,
        storage.id_allocator,
    ));
    let controller = Arc::new(TransactionController::new(service));
    api_routes(controller, token_service, request_timeout)
}
