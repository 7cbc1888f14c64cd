//! 存储后端装配

use std::sync::Arc;

use teller_adapter_postgres::SequenceIdAllocator;
use teller_bootstrap::Infrastructure;
use teller_domain_core::{AtomicIdAllocator, IdAllocator};
use tracing::info;

use crate::domain::repositories::TransactionRepository;

use super::persistence::{InMemoryTransactionRepository, PostgresTransactionRepository};

/// 默认主键序列
const DEFAULT_ID_SEQUENCE: &str = "transactions_id_seq";

/// 仓储与主键分配器
pub struct Storage {
    pub repository: Arc<dyn TransactionRepository>,
    pub id_allocator: Arc<dyn IdAllocator>,
}

impl Storage {
    /// 内存后端
    pub fn in_memory() -> Self {
        Self {
            repository: Arc::new(InMemoryTransactionRepository::new()),
            id_allocator: Arc::new(AtomicIdAllocator::new()),
        }
    }

    /// 按基础设施资源选择后端：有连接池即使用 PostgreSQL
    pub fn from_infrastructure(infra: &Infrastructure) -> Self {
        match infra.postgres_pool() {
            Some(pool) => {
                let sequence = infra
                    .config()
                    .database
                    .as_ref()
                    .map(|db| db.id_sequence.clone())
                    .unwrap_or_else(|| DEFAULT_ID_SEQUENCE.to_string());
                info!(%sequence, "Using PostgreSQL transaction repository");

                Self {
                    repository: Arc::new(PostgresTransactionRepository::new(pool.clone())),
                    id_allocator: Arc::new(SequenceIdAllocator::new(pool, sequence)),
                }
            }
            None => {
                info!("Using in-memory transaction repository");
                Self::in_memory()
            }
        }
    }
}
