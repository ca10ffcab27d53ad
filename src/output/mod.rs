//! Output module for terminal reports
//!
//! This module handles:
//! - Rendering batch results and stored history
//! - Loading and displaying history statistics

mod report;
pub mod stats;

pub use report::{
    format_batch_report, format_dry_run, format_history, print_batch_report, print_history,
};
pub use stats::{format_statistics, load_statistics, print_statistics};
