//! Database schema definitions
//!
//! The transaction table is dropped and rebuilt every time the database is
//! opened: each crawl run replaces the previous run's rows wholesale.

/// Name of the transaction table
pub const TABLE_NAME: &str = "aquatic_trans";

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
DROP TABLE IF EXISTS aquatic_trans;
CREATE TABLE aquatic_trans (
    id           INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT UNIQUE,
    type_name    TEXT NOT NULL,
    type_code    INTEGER NOT NULL,
    market_name  TEXT NOT NULL,
    high_price   REAL NOT NULL,
    low_price    REAL NOT NULL,
    mid_price    REAL NOT NULL,
    avg_price    REAL NOT NULL,
    date         TEXT NOT NULL,
    trans_amount REAL NOT NULL
);
"#;

/// Drops and recreates the transaction table
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
