//! Outcome records produced by the submission pipeline

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current time as an ISO-8601 UTC string with millisecond precision
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether a method attempt, or a whole URL, succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// The submission method that produced an outcome
///
/// Serialized as the human-readable label shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionMethod {
    #[serde(rename = "Google Indexing API")]
    VendorApi,
    #[serde(rename = "IndexNow (GET)")]
    ProtocolGet,
    #[serde(rename = "IndexNow (POST)")]
    ProtocolPost,
    #[serde(rename = "Google Ping (Deprecated)")]
    DeprecatedGooglePing,
    #[serde(rename = "Bing Ping (Deprecated)")]
    DeprecatedBingPing,
}

impl SubmissionMethod {
    /// Display label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Self::VendorApi => "Google Indexing API",
            Self::ProtocolGet => "IndexNow (GET)",
            Self::ProtocolPost => "IndexNow (POST)",
            Self::DeprecatedGooglePing => "Google Ping (Deprecated)",
            Self::DeprecatedBingPing => "Bing Ping (Deprecated)",
        }
    }

    /// Returns true for the placeholder methods that never touch the network
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::DeprecatedGooglePing | Self::DeprecatedBingPing)
    }
}

impl std::fmt::Display for SubmissionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one method attempt for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub url: String,
    pub status: OutcomeStatus,
    pub method: SubmissionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl SubmissionOutcome {
    pub fn success(url: &str, method: SubmissionMethod, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status: OutcomeStatus::Success,
            method,
            message: Some(message.into()),
            error: None,
            timestamp: now_iso(),
        }
    }

    pub fn failure(url: &str, method: SubmissionMethod, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status: OutcomeStatus::Failed,
            method,
            message: None,
            error: Some(error.into()),
            timestamp: now_iso(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Aggregated result for one URL of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlResult {
    pub url: String,
    pub status: OutcomeStatus,
    pub methods_used: Vec<SubmissionOutcome>,
    pub timestamp: String,
}

impl UrlResult {
    /// Builds the result for a URL from its outcomes, in attempt order
    ///
    /// The status is `Success` iff at least one outcome succeeded; an empty
    /// outcome list is `Failed`.
    pub fn from_outcomes(url: &str, methods_used: Vec<SubmissionOutcome>) -> Self {
        let status = if methods_used.iter().any(SubmissionOutcome::is_success) {
            OutcomeStatus::Success
        } else {
            OutcomeStatus::Failed
        };

        Self {
            url: url.to_string(),
            status,
            methods_used,
            timestamp: now_iso(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Counts derived from a sequence of URL results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[UrlResult]) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
        }
    }
}
