//! Storage module for persisting submission history
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Appending completed batches and their per-URL results
//! - Reading history newest-first
//! - Aggregate and seven-day statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::submit::{OutcomeStatus, SubmissionOutcome};
use serde::Serialize;

/// Represents one submitted URL in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub batch_id: i64,
    pub url: String,
    pub status: OutcomeStatus,
    pub methods_used: Vec<SubmissionOutcome>,
    pub timestamp: String,
    pub created_at: String,
}

/// Success and failure counts over a set of submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
}

impl StatusCounts {
    pub fn new(total: u64, successful: u64) -> Self {
        Self {
            total,
            successful,
            failed: total.saturating_sub(successful),
        }
    }
}

/// Aggregate history statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    /// Percentage with one decimal, or `"0"` when there is no history
    pub success_rate: String,
    pub last_7_days: StatusCounts,
}

impl HistoryStats {
    pub fn new(all: StatusCounts, last_7_days: StatusCounts) -> Self {
        Self {
            total: all.total,
            successful: all.successful,
            failed: all.failed,
            success_rate: format_success_rate(all.successful, all.total),
            last_7_days,
        }
    }
}

/// Formats a success percentage the way the history view shows it
pub fn format_success_rate(successful: u64, total: u64) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{:.1}", successful as f64 / total as f64 * 100.0)
}
