//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore
//! trait. Filters and sort keys are compiled to `json_extract` expressions
//! over the stored JSON bodies.

use crate::storage::is_valid_name;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    Document, DocumentStore, Filter, Op, SortKey, SortOrder, StorageError, StorageResult,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;

/// SQLite document store backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a document store at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened document store at {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory store (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Builds a parameterised `SELECT` over one collection
struct QueryBuilder {
    sql: String,
    params: Vec<SqlValue>,
}

impl QueryBuilder {
    fn new(select: &str, collection: &str) -> StorageResult<Self> {
        if !is_valid_name(collection) {
            return Err(StorageError::InvalidCollection(collection.to_string()));
        }
        Ok(Self {
            sql: format!("SELECT {} FROM documents WHERE collection = ?", select),
            params: vec![SqlValue::Text(collection.to_string())],
        })
    }

    /// SQL expression reading `field` from a document
    fn field(&mut self, field: &str) -> StorageResult<&'static str> {
        if field == SortKey::INSERTION_FIELD {
            return Ok("id");
        }
        if !is_valid_name(field) {
            return Err(StorageError::InvalidField(field.to_string()));
        }
        self.params.push(SqlValue::Text(format!("$.{}", field)));
        Ok("json_extract(body, ?)")
    }

    fn filter(mut self, filter: &Filter) -> StorageResult<Self> {
        for condition in &filter.conditions {
            let expr = self.field(&condition.field)?;
            let (operator, value) = match &condition.op {
                Op::Eq(value) => ("IS", value),
                Op::Gte(value) => (">=", value),
                Op::Lt(value) => ("<", value),
            };
            self.sql.push_str(&format!(" AND {} {} ?", expr, operator));
            self.params.push(to_sql_value(value));
        }
        Ok(self)
    }

    fn sort(mut self, sort: Option<&SortKey>) -> StorageResult<Self> {
        match sort {
            Some(key) => {
                let expr = self.field(&key.field)?;
                let direction = match key.order {
                    SortOrder::Ascending => "ASC",
                    SortOrder::Descending => "DESC",
                };
                self.sql.push_str(&format!(
                    " ORDER BY {} {}, id {}",
                    expr, direction, direction
                ));
            }
            None => self.sql.push_str(" ORDER BY id ASC"),
        }
        Ok(self)
    }

    fn limit(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            self.sql.push_str(" LIMIT ?");
            self.params
                .push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }
        self
    }
}

/// Converts a JSON value to what `json_extract` yields for it
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map(SqlValue::Real).unwrap_or(SqlValue::Null),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

impl DocumentStore for SqliteStore {
    fn insert(&mut self, collection: &str, document: &Document) -> StorageResult<i64> {
        if !is_valid_name(collection) {
            return Err(StorageError::InvalidCollection(collection.to_string()));
        }
        let body = serde_json::to_string(document)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
            params![collection, body],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortKey>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Document>> {
        let query = QueryBuilder::new("body", collection)?
            .filter(filter)?
            .sort(sort)?
            .limit(limit);

        let mut stmt = self.conn.prepare(&query.sql)?;
        let bodies = stmt
            .query_map(params_from_iter(query.params.iter()), |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        bodies
            .iter()
            .map(|body| {
                serde_json::from_str(body).map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect()
    }

    fn count(&self, collection: &str, filter: &Filter) -> StorageResult<u64> {
        let query = QueryBuilder::new("COUNT(*)", collection)?.filter(filter)?;

        let count: i64 = self.conn.query_row(
            &query.sql,
            params_from_iter(query.params.iter()),
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
