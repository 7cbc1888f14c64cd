//! 路由
//!
//! 查询参数与请求体的解析失败同样转换为校验失败信封。

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Deserialize;
use teller_auth_core::TokenService;
use teller_errors::AppError;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use super::controller::{ListResponse, SingleResponse, TransactionController};
use super::dto::TransactionPayload;
use super::envelope::EntityResponse;
use super::middleware::{auth_middleware, deadline_middleware};

/// 版本化路径前缀
pub const TRANSACTION_PREFIX: &str = "/api/v1/Transaction";

type Controller = State<Arc<TransactionController>>;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranIdQuery {
    pub tran_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PfNumberQuery {
    pub pf_number: i64,
}

/// 交易路由（不含前缀）
pub fn transaction_routes(controller: Arc<TransactionController>) -> Router {
    Router::new()
        .route("/get", get(find_by_id))
        .route("/create", post(create))
        .route("/modify", put(modify))
        .route("/getAllTransactions", get(get_all_transactions))
        .route("/getWithdraws", get(get_withdraws))
        .route("/getDeposits", get(get_deposits))
        .route("/getTransactionById", get(find_by_transaction_id))
        .route("/getTransactionByPf", get(find_transaction_by_pf))
        .with_state(controller)
}

/// 完整的业务路由：前缀、可选的令牌认证、请求时限、panic 兜底
pub fn api_routes(
    controller: Arc<TransactionController>,
    token_service: Option<Arc<TokenService>>,
    request_timeout: Duration,
) -> Router {
    let routes = Router::new().nest(TRANSACTION_PREFIX, transaction_routes(controller));

    let routes = match token_service {
        Some(token_service) => {
            routes.route_layer(from_fn_with_state(token_service, auth_middleware))
        }
        None => routes,
    };

    routes
        .layer(from_fn_with_state(request_timeout, deadline_middleware))
        .layer(CatchPanicLayer::custom(panic_envelope))
}

fn panic_envelope(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Transaction handler panicked");
    EntityResponse::<()>::failure(&AppError::internal("handler panicked")).into_response()
}

fn invalid_query(rejection: QueryRejection) -> AppError {
    AppError::validation(format!("Invalid query parameters: {}", rejection.body_text()))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

async fn find_by_id(
    State(controller): Controller,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> SingleResponse {
    match query {
        Ok(Query(q)) => controller.find_by_id(q.id).await,
        Err(r) => TransactionController::rejected("findById", invalid_query(r)),
    }
}

async fn create(
    State(controller): Controller,
    body: Result<Json<TransactionPayload>, JsonRejection>,
) -> SingleResponse {
    match body {
        Ok(Json(payload)) => controller.create(payload).await,
        Err(r) => TransactionController::rejected("create", invalid_body(r)),
    }
}

async fn modify(
    State(controller): Controller,
    body: Result<Json<TransactionPayload>, JsonRejection>,
) -> SingleResponse {
    match body {
        Ok(Json(payload)) => controller.modify(payload).await,
        Err(r) => TransactionController::rejected("modify", invalid_body(r)),
    }
}

async fn get_all_transactions(State(controller): Controller) -> ListResponse {
    controller.get_all_transactions().await
}

async fn get_withdraws(State(controller): Controller) -> ListResponse {
    controller.get_withdraws().await
}

async fn get_deposits(State(controller): Controller) -> ListResponse {
    controller.get_deposits().await
}

async fn find_by_transaction_id(
    State(controller): Controller,
    query: Result<Query<TranIdQuery>, QueryRejection>,
) -> SingleResponse {
    match query {
        Ok(Query(q)) => controller.find_by_transaction_id(q.tran_id).await,
        Err(r) => TransactionController::rejected("findByTransactionId", invalid_query(r)),
    }
}

async fn find_transaction_by_pf(
    State(controller): Controller,
    query: Result<Query<PfNumberQuery>, QueryRejection>,
) -> ListResponse {
    match query {
        Ok(Query(q)) => controller.find_transaction_by_pf(q.pf_number).await,
        Err(r) => TransactionController::rejected("findTransactionByPf", invalid_query(r)),
    }
}
