//! Plain-text rendering of batches and history for the terminal

use crate::storage::SubmissionRecord;
use crate::submit::{BatchReport, SubmissionOutcome, SubmissionPlan};

fn status_marker(success: bool) -> &'static str {
    if success {
        "OK  "
    } else {
        "FAIL"
    }
}

fn format_outcome(outcome: &SubmissionOutcome) -> String {
    let detail = outcome
        .message
        .as_deref()
        .or(outcome.error.as_deref())
        .unwrap_or_default();
    format!(
        "    [{}] {}: {}\n",
        status_marker(outcome.is_success()),
        outcome.method,
        detail
    )
}

/// Formats every URL of a batch with its method outcomes, then the totals
pub fn format_batch_report(report: &BatchReport) -> String {
    let mut out = String::new();

    for result in &report.results {
        out.push_str(&format!(
            "[{}] {}\n",
            status_marker(result.is_success()),
            result.url
        ));
        for outcome in &result.methods_used {
            out.push_str(&format_outcome(outcome));
        }
    }

    out.push_str(&format!(
        "\nProcessed {} URLs: {} successful, {} failed\n",
        report.summary.total, report.summary.successful, report.summary.failed
    ));
    out
}

/// Formats stored submissions, newest first
pub fn format_history(records: &[SubmissionRecord]) -> String {
    if records.is_empty() {
        return "No submission history.\n".to_string();
    }

    let mut out = format!("=== Last {} submissions ===\n\n", records.len());
    for record in records {
        out.push_str(&format!(
            "{}  [{}] {}\n",
            record.timestamp,
            status_marker(record.status.is_success()),
            record.url
        ));
        for outcome in &record.methods_used {
            out.push_str(&format_outcome(outcome));
        }
    }
    out
}

/// Describes what a batch would do without submitting anything
pub fn format_dry_run(urls: &[String], plan: &SubmissionPlan) -> String {
    let mut out = format!("Would submit {} URLs\n", urls.len());
    out.push_str(&format!("Methods: {}\n", plan.describe()));
    if plan.use_vendor_api && !plan.vendor_enabled() {
        out.push_str("Warning: Google API requested but no credentials provided\n");
    }
    for url in urls {
        out.push_str(&format!("  {}\n", url));
    }
    out
}

pub fn print_batch_report(report: &BatchReport) {
    print!("{}", format_batch_report(report));
}

pub fn print_history(records: &[SubmissionRecord]) {
    print!("{}", format_history(records));
}
