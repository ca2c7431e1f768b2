//! Task statistics from the document store
//!
//! This module provides read-only aggregate queries over task documents:
//! - Failures among a spider's most recent tasks
//! - Tasks created within a trailing window of days
//! - Field names present in a result collection

mod task;

pub use task::{
    TaskRecord, TaskStatus, CREATE_TS_FIELD, SPIDER_ID_FIELD, STATUS_FIELD, TASK_ID_FIELD,
};

use crate::config::Config;
use crate::storage::{timestamp, DocumentStore, Filter, SortKey, StorageResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

/// Task counts for one spider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiderStats {
    /// Failures among the most recent tasks
    pub recent_failures: usize,

    /// Tasks created in the trailing window
    pub trailing_tasks: u64,
}

/// Counts FAILURE tasks among the `n` most recent tasks of a spider
///
/// # Arguments
///
/// * `store` - The document store to query
/// * `collection` - The task collection
/// * `spider_id` - The owning spider
/// * `n` - How many of the newest tasks (by `create_ts`) to inspect
pub fn recent_failure_count(
    store: &dyn DocumentStore,
    collection: &str,
    spider_id: &str,
    n: usize,
) -> StorageResult<usize> {
    let filter = Filter::new().eq(SPIDER_ID_FIELD, spider_id);
    let newest_first = SortKey::descending(CREATE_TS_FIELD);
    let tasks = store.list(collection, &filter, Some(&newest_first), Some(n))?;

    let failures = tasks
        .iter()
        .filter(|task| TaskRecord::status_of(task) == Some(TaskStatus::Failure))
        .count();

    tracing::debug!(
        "Spider {}: {} failures in last {} of {} tasks",
        spider_id,
        failures,
        n,
        tasks.len()
    );
    Ok(failures)
}

/// Counts tasks of a spider created in the last `days` days
pub fn trailing_task_count(
    store: &dyn DocumentStore,
    collection: &str,
    spider_id: &str,
    days: u32,
) -> StorageResult<u64> {
    trailing_task_count_at(store, collection, spider_id, days, Utc::now())
}

/// Counts tasks created in `[now - days, now)`
///
/// A window reaching past the earliest representable time starts there.
pub fn trailing_task_count_at(
    store: &dyn DocumentStore,
    collection: &str,
    spider_id: &str,
    days: u32,
    now: DateTime<Utc>,
) -> StorageResult<u64> {
    let start = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let filter = Filter::new()
        .eq(SPIDER_ID_FIELD, spider_id)
        .gte(CREATE_TS_FIELD, timestamp(start))
        .lt(CREATE_TS_FIELD, timestamp(now));

    store.count(collection, &filter)
}

/// Sorted union of the field names of a collection's first `limit` documents
///
/// With a `task_id`, only documents linked to that task are inspected.
pub fn collection_fields(
    store: &dyn DocumentStore,
    collection: &str,
    task_id: Option<&str>,
    limit: usize,
) -> StorageResult<Vec<String>> {
    let filter = match task_id {
        Some(id) => Filter::new().eq(TASK_ID_FIELD, id),
        None => Filter::new(),
    };

    let fields: BTreeSet<String> = store
        .list(collection, &filter, None, Some(limit))?
        .into_iter()
        .flat_map(|document| document.into_iter().map(|(key, _)| key))
        .collect();

    Ok(fields.into_iter().collect())
}

/// Loads both task counts for a spider using the configured collection and windows
pub fn load_spider_stats(
    store: &dyn DocumentStore,
    spider_id: &str,
    config: &Config,
) -> StorageResult<SpiderStats> {
    let collection = &config.storage.task_collection;

    let stats = SpiderStats {
        recent_failures: recent_failure_count(
            store,
            collection,
            spider_id,
            config.stats.recent_tasks,
        )?,
        trailing_tasks: trailing_task_count(
            store,
            collection,
            spider_id,
            config.stats.trailing_days,
        )?,
    };

    tracing::info!(
        "Spider {}: {} recent failures, {} tasks in {} days",
        spider_id,
        stats.recent_failures,
        stats.trailing_tasks,
        config.stats.trailing_days
    );
    Ok(stats)
}
