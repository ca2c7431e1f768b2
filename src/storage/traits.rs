//! Storage traits, query types and error types
//!
//! This module defines the document store interface and the filter and
//! sort descriptions its queries take.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid collection name: '{0}'")]
    InvalidCollection(String),

    #[error("Invalid field name: '{0}'")]
    InvalidField(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A schemaless document
pub type Document = Map<String, Value>;

/// Comparison applied to a document field
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Eq(Value),
    Gte(Value),
    Lt(Value),
}

/// A single field condition
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
}

/// Conjunction of field conditions; an empty filter matches everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(field, Op::Eq(value.into()))
    }

    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(field, Op::Gte(value.into()))
    }

    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.with(field, Op::Lt(value.into()))
    }

    fn with(mut self, field: &str, op: Op) -> Self {
        self.conditions.push(Condition {
            field: field.to_string(),
            op,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort key for [`DocumentStore::list`]
///
/// The field name `_id` sorts by insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    pub const INSERTION_FIELD: &'static str = "_id";

    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            order: SortOrder::Descending,
        }
    }
}

/// Trait for document store backends
///
/// Documents live in named collections. Queries select documents with a
/// [`Filter`], optionally ordered by a [`SortKey`] and truncated to a limit.
/// Without a sort key, documents come back in insertion order.
pub trait DocumentStore {
    /// Inserts a document and returns its id
    fn insert(&mut self, collection: &str, document: &Document) -> StorageResult<i64>;

    /// Lists the documents of `collection` matching `filter`
    fn list(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortKey>,
        limit: Option<usize>,
    ) -> StorageResult<Vec<Document>>;

    /// Counts the documents of `collection` matching `filter`
    fn count(&self, collection: &str, filter: &Filter) -> StorageResult<u64>;
}
