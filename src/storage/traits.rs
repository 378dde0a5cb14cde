//! Storage traits and error types

use crate::crawler::Record;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for transaction-record persistence backends
///
/// The fetch workers only ever see storage through this seam: insert a
/// batch, and (for reporting and tests) count what has been stored.
pub trait RecordStore {
    /// Inserts a batch of records inside a single transaction.
    ///
    /// The whole response for one date is committed or rolled back as a
    /// unit. Returns the number of rows written.
    fn insert_batch(&mut self, records: &[Record]) -> StorageResult<usize>;

    /// Counts all stored records.
    fn record_count(&self) -> StorageResult<u64>;
}
