//! Task status and record definitions
//!
//! Task documents carry the owning spider, a status string and a creation
//! timestamp. Other fields are left to the caller.

use crate::storage::{timestamp, Document};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Field holding the owning spider id
pub const SPIDER_ID_FIELD: &str = "spider_id";
/// Field holding the status string
pub const STATUS_FIELD: &str = "status";
/// Field holding the creation timestamp
pub const CREATE_TS_FIELD: &str = "create_ts";
/// Field linking result documents to their task
pub const TASK_ID_FIELD: &str = "task_id";

/// Lifecycle status of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Success,
    Failure,
    Retry,
    Revoked,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Started => "STARTED",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Retry => "RETRY",
            Self::Revoked => "REVOKED",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "STARTED" => Some(Self::Started),
            "SUCCESS" => Some(Self::Success),
            "FAILURE" => Some(Self::Failure),
            "RETRY" => Some(Self::Retry),
            "REVOKED" => Some(Self::Revoked),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as stored in the task collection
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub spider_id: String,
    pub status: TaskStatus,
    pub create_ts: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(spider_id: &str, status: TaskStatus, create_ts: DateTime<Utc>) -> Self {
        Self {
            spider_id: spider_id.to_string(),
            status,
            create_ts,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(
            SPIDER_ID_FIELD.to_string(),
            Value::String(self.spider_id.clone()),
        );
        document.insert(
            STATUS_FIELD.to_string(),
            Value::String(self.status.as_str().to_string()),
        );
        document.insert(
            CREATE_TS_FIELD.to_string(),
            Value::String(timestamp(self.create_ts)),
        );
        document
    }

    /// Status of a stored task document, if it has a known one
    pub fn status_of(document: &Document) -> Option<TaskStatus> {
        document
            .get(STATUS_FIELD)
            .and_then(Value::as_str)
            .and_then(TaskStatus::from_db_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::Started,
            TaskStatus::Success,
            TaskStatus::Failure,
            TaskStatus::Retry,
            TaskStatus::Revoked,
        ] {
            assert_eq!(TaskStatus::from_db_string(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_db_string("failure"), None);
    }

    #[test]
    fn test_status_serde_matches_db_string() {
        let json = serde_json::to_string(&TaskStatus::Failure).unwrap();
        assert_eq!(json, "\"FAILURE\"");
    }

    #[test]
    fn test_record_to_document() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let document = TaskRecord::new("spider-1", TaskStatus::Success, at).to_document();

        assert_eq!(document[SPIDER_ID_FIELD], "spider-1");
        assert_eq!(document[STATUS_FIELD], "SUCCESS");
        assert_eq!(document[CREATE_TS_FIELD], "2024-06-01T12:00:00.000Z");
        assert_eq!(TaskRecord::status_of(&document), Some(TaskStatus::Success));
    }
}
