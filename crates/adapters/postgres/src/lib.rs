//! teller-adapter-postgres - PostgreSQL 适配器

mod connection;
mod error_mapper;
mod health;
mod sequence;

pub use connection::*;
pub use error_mapper::*;
pub use health::*;
pub use sequence::*;
