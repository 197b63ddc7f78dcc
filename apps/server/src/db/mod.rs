//! Database layer - the record store trait and its backends

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use traits::{RecordStore, StoreError, StoreResult};
