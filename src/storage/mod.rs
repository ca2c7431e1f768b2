//! Storage module for task documents
//!
//! This module handles the document store the statistics queries run
//! against, including:
//! - The `DocumentStore` trait with filter and sort descriptions
//! - A SQLite implementation storing JSON documents per collection
//! - Timestamp formatting that keeps stored times comparable as text

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{
    Condition, Document, DocumentStore, Filter, Op, SortKey, SortOrder, StorageError,
    StorageResult,
};

use chrono::{DateTime, SecondsFormat, Utc};

/// Checks a collection or field name: non-empty ASCII alphanumerics and `_`
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Formats a time for storage
///
/// Always RFC 3339 in UTC with millisecond precision, so stored timestamps
/// sort chronologically as strings.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("tasks"));
        assert!(is_valid_name("spider_id"));
        assert!(is_valid_name("results_2024"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("a.b"));
        assert!(!is_valid_name("tasks; DROP"));
        assert!(!is_valid_name("naïve"));
    }

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(timestamp(at), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn test_timestamps_sort_chronologically() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        let later = base + Duration::milliseconds(1500);
        assert!(timestamp(base) < timestamp(later));
    }
}
