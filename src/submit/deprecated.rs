//! Placeholder outcomes for the discontinued search-engine ping services
//!
//! Neither function performs network I/O. They exist so a URL submitted with
//! no configured method still carries an explanation in its results.

use crate::submit::outcome::{SubmissionMethod, SubmissionOutcome};

pub fn ping_google(url: &str) -> SubmissionOutcome {
    SubmissionOutcome::failure(
        url,
        SubmissionMethod::DeprecatedGooglePing,
        "Service discontinued by Google. Use Google Indexing API instead.",
    )
}

pub fn ping_bing(url: &str) -> SubmissionOutcome {
    SubmissionOutcome::failure(
        url,
        SubmissionMethod::DeprecatedBingPing,
        "Service discontinued by Bing. Use IndexNow API instead.",
    )
}
