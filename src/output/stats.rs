//! Statistics from the history database
//!
//! This module provides functionality for loading and displaying
//! submission statistics from the storage layer.

use crate::storage::{HistoryStats, Storage};
use crate::CourierError;
use chrono::Utc;

/// Loads statistics from storage as of now
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(HistoryStats)` - Successfully loaded statistics
/// * `Err(CourierError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> Result<HistoryStats, CourierError> {
    Ok(storage.history_stats(Utc::now())?)
}

/// Formats statistics as a plain-text block
pub fn format_statistics(stats: &HistoryStats) -> String {
    let mut out = String::new();

    out.push_str("=== Submission Statistics ===\n\n");

    out.push_str("All time:\n");
    out.push_str(&format!("  Total URLs submitted: {}\n", stats.total));
    out.push_str(&format!("  Successful: {}\n", stats.successful));
    out.push_str(&format!("  Failed: {}\n", stats.failed));
    out.push_str(&format!("  Success rate: {}%\n\n", stats.success_rate));

    out.push_str("Last 7 days:\n");
    out.push_str(&format!("  Total: {}\n", stats.last_7_days.total));
    out.push_str(&format!("  Successful: {}\n", stats.last_7_days.successful));
    out.push_str(&format!("  Failed: {}\n", stats.last_7_days.failed));

    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HistoryStats) {
    print!("{}", format_statistics(stats));
}
