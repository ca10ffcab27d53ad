//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{HistoryStats, StatusCounts, SubmissionRecord};
use crate::submit::{now_iso, BatchReport, OutcomeStatus, SubmissionOutcome};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count_statuses(&self, since: Option<&str>) -> StorageResult<StatusCounts> {
        let sql = "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = ?1 THEN 1 ELSE 0 END), 0)
                   FROM submissions WHERE ?2 IS NULL OR created_at >= ?2";

        let (total, successful): (i64, i64) = self.conn.query_row(
            sql,
            params![OutcomeStatus::Success.to_db_string(), since],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StatusCounts::new(total as u64, successful as u64))
    }
}

impl Storage for SqliteStorage {
    fn record_batch(&mut self, config_hash: &str, report: &BatchReport) -> StorageResult<i64> {
        let created_at = now_iso();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO batches (started_at, finished_at, config_hash, total, successful, failed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report.started_at,
                report.finished_at,
                config_hash,
                report.summary.total as i64,
                report.summary.successful as i64,
                report.summary.failed as i64,
            ],
        )?;
        let batch_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO submissions (batch_id, url, status, methods_used, timestamp, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for result in &report.results {
                let methods_used = serde_json::to_string(&result.methods_used)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                stmt.execute(params![
                    batch_id,
                    result.url,
                    result.status.to_db_string(),
                    methods_used,
                    result.timestamp,
                    created_at,
                ])?;
            }
        }

        tx.commit()?;
        Ok(batch_id)
    }

    fn read_history(&self, limit: usize) -> StorageResult<Vec<SubmissionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, batch_id, url, status, methods_used, timestamp, created_at
             FROM submissions
             ORDER BY created_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, batch_id, url, status, methods_used, timestamp, created_at) = row?;

            let status = OutcomeStatus::from_db_string(&status)
                .ok_or_else(|| StorageError::InvalidValue(format!("status '{}'", status)))?;
            let methods_used: Vec<SubmissionOutcome> = serde_json::from_str(&methods_used)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;

            records.push(SubmissionRecord {
                id,
                batch_id,
                url,
                status,
                methods_used,
                timestamp,
                created_at,
            });
        }

        Ok(records)
    }

    fn history_stats(&self, now: DateTime<Utc>) -> StorageResult<HistoryStats> {
        let cutoff = (now - Duration::days(7)).to_rfc3339_opts(SecondsFormat::Millis, true);

        let all = self.count_statuses(None)?;
        let recent = self.count_statuses(Some(&cutoff))?;

        Ok(HistoryStats::new(all, recent))
    }

    fn clear_history(&mut self) -> StorageResult<u64> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM submissions", [])?;
        tx.execute("DELETE FROM batches", [])?;
        tx.commit()?;
        Ok(removed as u64)
    }
}
