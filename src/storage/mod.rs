//! Storage layer for parsed transaction records
//!
//! One table, one writer discipline: each response's records are committed
//! as a single transaction by whichever worker parsed them.

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, SCHEMA_SQL, TABLE_NAME};
pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};
