//! 交易请求处理器
//!
//! 每个请求对应一次服务调用，结果包装为响应信封；不含业务逻辑。

use std::sync::Arc;

use teller_domain_core::EntityId;
use teller_errors::{AppError, AppResult};
use teller_telemetry::record_operation;
use tracing::{error, warn};

use crate::application::TransactionService;
use crate::domain::Transaction;

use super::dto::{TransactionPayload, TransactionResponse};
use super::envelope::EntityResponse;

pub type SingleResponse = EntityResponse<TransactionResponse>;
pub type ListResponse = EntityResponse<Vec<TransactionResponse>>;

/// 交易请求处理器
pub struct TransactionController {
    service: Arc<dyn TransactionService>,
}

impl TransactionController {
    pub fn new(service: Arc<dyn TransactionService>) -> Self {
        Self { service }
    }

    pub async fn find_by_id(&self, id: i64) -> SingleResponse {
        let result = self.service.find_by_id(EntityId(id)).await;
        respond("findById", result, |tx| {
            EntityResponse::ok("Transaction found", TransactionResponse::from(tx))
        })
    }

    pub async fn create(&self, payload: TransactionPayload) -> SingleResponse {
        let result = match payload.into_create_command() {
            Ok(cmd) => self.service.create(cmd).await,
            Err(e) => Err(e),
        };
        respond("create", result, |tx| {
            EntityResponse::created("Transaction created", TransactionResponse::from(tx))
        })
    }

    pub async fn modify(&self, payload: TransactionPayload) -> SingleResponse {
        let result = match payload.into_modify_command() {
            Ok(cmd) => self.service.modify(cmd).await,
            Err(e) => Err(e),
        };
        respond("modify", result, |tx| {
            EntityResponse::ok("Transaction modified", TransactionResponse::from(tx))
        })
    }

    pub async fn get_all_transactions(&self) -> ListResponse {
        let result = self.service.get_all().await;
        respond("getAllTransactions", result, list("Transactions retrieved"))
    }

    pub async fn get_withdraws(&self) -> ListResponse {
        let result = self.service.get_withdraws().await;
        respond("getWithdraws", result, list("Withdrawals retrieved"))
    }

    pub async fn get_deposits(&self) -> ListResponse {
        let result = self.service.get_deposits().await;
        respond("getDeposits", result, list("Deposits retrieved"))
    }

    pub async fn find_by_transaction_id(&self, tran_id: String) -> SingleResponse {
        let result = self.service.find_by_tran_id(tran_id).await;
        respond("findByTransactionId", result, |tx| {
            EntityResponse::ok("Transaction found", TransactionResponse::from(tx))
        })
    }

    pub async fn find_transaction_by_pf(&self, pf_number: i64) -> ListResponse {
        let result = self.service.find_by_pf_number(pf_number).await;
        respond("findTransactionByPf", result, list("Transactions retrieved"))
    }

    /// 请求无法解析（JSON 或查询参数错误）时的信封
    pub fn rejected<T>(operation: &'static str, err: AppError) -> EntityResponse<T> {
        failure(operation, err)
    }
}

fn list(message: &'static str) -> impl FnOnce(Vec<Transaction>) -> ListResponse {
    move |items| EntityResponse::ok(message, items.into_iter().map(Into::into).collect())
}

fn respond<T, R>(
    operation: &'static str,
    result: AppResult<T>,
    on_success: impl FnOnce(T) -> EntityResponse<R>,
) -> EntityResponse<R> {
    match result {
        Ok(value) => {
            record_operation(operation, "success");
            on_success(value)
        }
        Err(err) => failure(operation, err),
    }
}

fn failure<R>(operation: &'static str, err: AppError) -> EntityResponse<R> {
    if err.is_internal() {
        error!(operation, error = %err, "Transaction operation failed");
    } else {
        warn!(operation, error = %err, "Transaction request rejected");
    }
    record_operation(operation, err.kind().as_str());
    EntityResponse::failure(&err)
}
