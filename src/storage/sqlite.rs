//! SQLite storage implementation

use crate::crawler::Record;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database at `path` and rebuilds the transaction table,
    /// discarding rows from any previous run.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, flushing any pending state.
    pub fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}

impl RecordStore for SqliteStorage {
    fn insert_batch(&mut self, records: &[Record]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO aquatic_trans
                 (type_name, type_code, market_name, high_price, low_price, mid_price, avg_price, date, trans_amount)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.type_name,
                    record.type_code,
                    record.market_name,
                    record.high_price,
                    record.low_price,
                    record.mid_price,
                    record.avg_price,
                    record.date,
                    record.trans_amount,
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    fn record_count(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM aquatic_trans", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
