//! Serial batch execution with pacing and mutual exclusion
//!
//! A [`BatchRunner`] owns its [`SessionGuard`], so every deployment (and
//! every test) gets its own busy flag. Requests are checked in this order:
//! busy, then URL validity, then vendor credentials.

use crate::config::Config;
use crate::submit::client::{build_http_client, SubmissionSettings};
use crate::submit::guard::SessionGuard;
use crate::submit::orchestrator::{Orchestrator, SubmissionPlan, UrlSubmitter};
use crate::submit::outcome::{now_iso, BatchSummary, UrlResult};
use crate::submit::vendor::VendorCredentials;
use crate::url::validate_urls;
use crate::SubmitError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default delay between consecutive URLs
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

/// A caller's request to submit a list of URLs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    pub urls: Vec<String>,

    #[serde(default, alias = "use_google_api")]
    pub use_vendor_api: bool,

    #[serde(default, alias = "google_credentials")]
    pub vendor_credentials: Option<serde_json::Value>,

    #[serde(default, alias = "indexnow_key")]
    pub protocol_key: Option<String>,
}

impl BatchRequest {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Validates the request into the URL list and plan a batch will use
    ///
    /// # Returns
    ///
    /// * `Err(SubmitError::NoValidUrls)` - No candidate is an http(s) URL
    /// * `Err(SubmitError::MissingVendorCredentials)` - Vendor API requested
    ///   without a credentials object (`null`, `""`, `false` and other
    ///   scalars count as missing)
    pub fn into_plan(self) -> Result<(Vec<String>, SubmissionPlan), SubmitError> {
        let urls = validate_urls(&self.urls);
        if urls.is_empty() {
            return Err(SubmitError::NoValidUrls);
        }

        let vendor_credentials = self
            .vendor_credentials
            .filter(serde_json::Value::is_object)
            .map(VendorCredentials::new);
        if self.use_vendor_api && vendor_credentials.is_none() {
            return Err(SubmitError::MissingVendorCredentials);
        }

        let plan = SubmissionPlan {
            use_vendor_api: self.use_vendor_api,
            vendor_credentials,
            protocol_key: self.protocol_key,
        };
        Ok((urls, plan))
    }
}

/// Results of one completed batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<UrlResult>,
    #[serde(flatten)]
    pub summary: BatchSummary,
    #[serde(skip)]
    pub started_at: String,
    #[serde(skip)]
    pub finished_at: String,
}

impl BatchReport {
    pub fn new(results: Vec<UrlResult>, started_at: String) -> Self {
        let summary = BatchSummary::from_results(&results);
        Self {
            results,
            summary,
            started_at,
            finished_at: now_iso(),
        }
    }
}

/// What the runner is doing right now
#[derive(Debug, Clone)]
pub enum BatchStatus {
    Idle,
    InProgress,
    Complete(BatchReport),
}

pub struct BatchRunner {
    submitter: Arc<dyn UrlSubmitter>,
    guard: SessionGuard,
    last_report: Mutex<Option<BatchReport>>,
    pacing_delay: Duration,
}

impl BatchRunner {
    pub fn new(submitter: Arc<dyn UrlSubmitter>) -> Self {
        Self::with_pacing(submitter, DEFAULT_PACING_DELAY)
    }

    /// Builds a runner backed by the network orchestrator for a config
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent)?;
        let settings = SubmissionSettings::from_config(config);
        let pacing_delay = settings.pacing_delay;
        let orchestrator = Orchestrator::new(client, settings);
        Ok(Self::with_pacing(Arc::new(orchestrator), pacing_delay))
    }

    pub fn with_pacing(submitter: Arc<dyn UrlSubmitter>, pacing_delay: Duration) -> Self {
        Self {
            submitter,
            guard: SessionGuard::new(),
            last_report: Mutex::new(None),
            pacing_delay,
        }
    }

    /// Runs a full batch for a caller's request
    ///
    /// Rejections happen before any network call. Per-method failures are
    /// never returned as errors; they live inside the report's results.
    pub async fn submit(&self, request: BatchRequest) -> Result<BatchReport, SubmitError> {
        let _permit = self.guard.try_acquire().ok_or(SubmitError::Busy)?;
        let (urls, plan) = request.into_plan()?;

        self.set_last_report(None);
        let report = self.run_validated(&urls, &plan).await;
        self.set_last_report(Some(report.clone()));

        Ok(report)
    }

    /// Submits already-validated URLs one after another
    ///
    /// Sleeps for the pacing delay between consecutive URLs, never after
    /// the last one. Does not touch the session guard.
    pub async fn run_validated(&self, urls: &[String], plan: &SubmissionPlan) -> BatchReport {
        let started_at = now_iso();
        let mut results = Vec::with_capacity(urls.len());

        tracing::info!(
            "Starting batch of {} URLs (methods: {})",
            urls.len(),
            plan.describe()
        );

        for (i, url) in urls.iter().enumerate() {
            tracing::info!("[{}/{}] {}", i + 1, urls.len(), url);
            results.push(self.submitter.submit_url(url, plan).await);

            if i + 1 < urls.len() && !self.pacing_delay.is_zero() {
                tokio::time::sleep(self.pacing_delay).await;
            }
        }

        let report = BatchReport::new(results, started_at);
        tracing::info!(
            "Batch complete: {} total, {} successful, {} failed",
            report.summary.total,
            report.summary.successful,
            report.summary.failed
        );
        report
    }

    pub fn status(&self) -> BatchStatus {
        if self.guard.is_active() {
            return BatchStatus::InProgress;
        }
        match self.last_report() {
            Some(report) => BatchStatus::Complete(report),
            None => BatchStatus::Idle,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_active()
    }

    pub fn last_report(&self) -> Option<BatchReport> {
        self.last_report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_last_report(&self, report: Option<BatchReport>) {
        *self
            .last_report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = report;
    }
}
