//! Database schema definitions
//!
//! Every collection shares one table; document bodies are stored as JSON
//! text and queried with SQLite's JSON functions.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Documents of every collection
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    body TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        let result = initialize_schema(&conn);

        assert!(result.is_ok());
    }

    #[test]
    fn test_documents_table_exists() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='documents'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_json_functions_available() {
        let conn = Connection::open_in_memory().unwrap();
        let value: String = conn
            .query_row(
                "SELECT json_extract('{\"status\":\"FAILURE\"}', '$.status')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(value, "FAILURE");
    }
}
