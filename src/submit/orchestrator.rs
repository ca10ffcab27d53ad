//! Per-URL orchestration of the submission methods
//!
//! # Attempt Order
//!
//! | Step | Condition | Methods |
//! |------|-----------|---------|
//! | 1 | vendor API requested and credentials present | Vendor API |
//! | 2 | protocol key present | IndexNow GET, then POST if GET failed |
//! | 3 | neither 1 nor 2 ran | both deprecated placeholders |
//!
//! Methods run strictly one after another. The URL succeeds iff any
//! recorded outcome succeeded.

use crate::submit::client::SubmissionSettings;
use crate::submit::deprecated::{ping_bing, ping_google};
use crate::submit::outcome::{SubmissionOutcome, UrlResult};
use crate::submit::protocol_get::submit_protocol_get;
use crate::submit::protocol_post::submit_protocol_post;
use crate::submit::vendor::{submit_vendor_api, VendorCredentials};
use async_trait::async_trait;
use reqwest::Client;

/// Which methods a batch is configured to use
#[derive(Debug, Clone, Default)]
pub struct SubmissionPlan {
    pub use_vendor_api: bool,
    pub vendor_credentials: Option<VendorCredentials>,
    pub protocol_key: Option<String>,
}

impl SubmissionPlan {
    /// True when the vendor method will actually be attempted
    pub fn vendor_enabled(&self) -> bool {
        self.use_vendor_api && self.vendor_credentials.is_some()
    }

    /// The protocol key, ignoring blank values
    pub fn protocol_key(&self) -> Option<&str> {
        self.protocol_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Human-readable list of the methods this plan will try
    pub fn describe(&self) -> String {
        let mut methods = Vec::new();
        if self.use_vendor_api {
            methods.push("Google API");
        }
        if self.protocol_key().is_some() {
            methods.push("IndexNow API");
        }
        if methods.is_empty() {
            methods.push("None (deprecated methods only)");
        }
        methods.join(", ")
    }
}

/// Submits a single URL and aggregates its outcomes
#[async_trait]
pub trait UrlSubmitter: Send + Sync {
    async fn submit_url(&self, url: &str, plan: &SubmissionPlan) -> UrlResult;
}

/// The network-backed submitter driving the real methods
pub struct Orchestrator {
    client: Client,
    settings: SubmissionSettings,
}

impl Orchestrator {
    pub fn new(client: Client, settings: SubmissionSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }
}

#[async_trait]
impl UrlSubmitter for Orchestrator {
    async fn submit_url(&self, url: &str, plan: &SubmissionPlan) -> UrlResult {
        let mut methods_used: Vec<SubmissionOutcome> = Vec::new();
        tracing::info!("Processing: {}", url);

        let mut vendor_attempted = false;
        if plan.use_vendor_api {
            if let Some(credentials) = &plan.vendor_credentials {
                tracing::info!("Using Google Indexing API for {}", url);
                let outcome =
                    submit_vendor_api(&self.client, url, credentials, &self.settings).await;
                log_outcome(&outcome);
                methods_used.push(outcome);
                vendor_attempted = true;
            } else {
                tracing::debug!("Google API requested without credentials, skipping");
            }
        }

        let key = plan.protocol_key();
        if let Some(key) = key {
            tracing::info!("Using IndexNow API for {}", url);
            let get_outcome = submit_protocol_get(&self.client, url, key, &self.settings).await;
            log_outcome(&get_outcome);
            let get_failed = !get_outcome.is_success();
            methods_used.push(get_outcome);

            if get_failed {
                tracing::info!("Falling back to IndexNow POST for {}", url);
                let post_outcome =
                    submit_protocol_post(&self.client, url, key, &self.settings).await;
                log_outcome(&post_outcome);
                methods_used.push(post_outcome);
            }
        }

        if !vendor_attempted && key.is_none() {
            tracing::warn!(
                "No submission method configured for {}; recording deprecated ping outcomes",
                url
            );
            methods_used.push(ping_google(url));
            methods_used.push(ping_bing(url));
        }

        let result = UrlResult::from_outcomes(url, methods_used);
        if result.is_success() {
            tracing::info!("Overall: SUCCESS for {}", url);
        } else {
            tracing::info!("Overall: FAILED for {}", url);
        }
        result
    }
}

fn log_outcome(outcome: &SubmissionOutcome) {
    if outcome.is_success() {
        tracing::info!(
            "{} succeeded: {}",
            outcome.method,
            outcome.message.as_deref().unwrap_or_default()
        );
    } else {
        tracing::warn!(
            "{} failed: {}",
            outcome.method,
            outcome.error.as_deref().unwrap_or_default()
        );
    }
}
