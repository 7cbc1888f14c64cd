//! 持久化实现

mod converters;
mod memory;
mod postgres;
mod rows;

pub use memory::InMemoryTransactionRepository;
pub use postgres::PostgresTransactionRepository;
