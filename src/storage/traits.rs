//! Storage traits and error types
//!
//! This module defines the trait interface for history backends and
//! associated error types.

use crate::storage::{HistoryStats, SubmissionRecord};
use crate::submit::BatchReport;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for submission history backends
///
/// History is append-only apart from [`Storage::clear_history`]. Callers
/// treat writes as fire-and-forget, so a failed write never changes the
/// batch response already computed.
pub trait Storage {
    /// Appends a completed batch and one submission row per URL result
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration the batch ran under
    /// * `report` - The completed batch
    ///
    /// # Returns
    ///
    /// The ID of the newly created batch
    fn record_batch(&mut self, config_hash: &str, report: &BatchReport) -> StorageResult<i64>;

    /// Reads up to `limit` submissions, newest first
    fn read_history(&self, limit: usize) -> StorageResult<Vec<SubmissionRecord>>;

    /// Aggregates all submissions, plus the seven days before `now`
    fn history_stats(&self, now: DateTime<Utc>) -> StorageResult<HistoryStats>;

    /// Deletes every batch and submission
    ///
    /// # Returns
    ///
    /// The number of submissions removed
    fn clear_history(&mut self) -> StorageResult<u64>;
}
