//! teller-transaction Service - Teller Transactions

use std::time::Duration;

use teller_bootstrap::{Infrastructure, run_http};
use teller_transaction::build_router;
use teller_transaction::infrastructure::Storage;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    run_http("config", |infra: Infrastructure| async move {
        info!("Initializing teller-transaction Service...");

        let storage = Storage::from_infrastructure(&infra);
        let request_timeout = Duration::from_secs(infra.config().server.request_timeout_secs);
        let router = build_router(storage, infra.token_service(), request_timeout);

        info!("Transaction routes registered");
        Ok(router)
    })
    .await
}
