//! 主键分配策略
//!
//! 只保证唯一，不保证连续或有序。

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use teller_errors::{AppError, AppResult};

use crate::EntityId;

/// 主键分配器
#[async_trait]
pub trait IdAllocator: Send + Sync {
    /// 分配一个从未使用过的主键
    async fn allocate(&self) -> AppResult<EntityId>;
}

/// 进程内递增分配器
///
/// 用于内存存储后端；分配出的值不会被复用。
#[derive(Debug)]
pub struct AtomicIdAllocator {
    next: AtomicI64,
}

impl AtomicIdAllocator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for AtomicIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdAllocator for AtomicIdAllocator {
    async fn allocate(&self) -> AppResult<EntityId> {
        self.next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .map(EntityId)
            .map_err(|_| AppError::internal("Identifier space exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_allocates_from_one() {
        let allocator = AtomicIdAllocator::new();
        assert_eq!(allocator.allocate().await.unwrap(), EntityId(1));
        assert_eq!(allocator.allocate().await.unwrap(), EntityId(2));
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_unique() {
        let allocator = Arc::new(AtomicIdAllocator::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for _ in 0..100 {
                    ids.push(allocator.allocate().await.unwrap());
                }
                ids
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 800);
    }

    #[tokio::test]
    async fn test_exhaustion_is_an_error() {
        let allocator = AtomicIdAllocator::starting_at(i64::MAX);
        assert!(allocator.allocate().await.is_err());
    }
}
