//! HTTP client and endpoint settings shared by the submission methods

use crate::config::{Config, EngineEntry, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Connect timeout applied to every outbound request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One IndexNow engine contacted by GET submissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    pub name: String,
    pub endpoint: String,
}

impl From<&EngineEntry> for Engine {
    fn from(entry: &EngineEntry) -> Self {
        Self {
            name: entry.name.clone(),
            endpoint: entry.endpoint.clone(),
        }
    }
}

/// Endpoints and timeouts used by the submission methods
#[derive(Debug, Clone)]
pub struct SubmissionSettings {
    /// Engines for GET submissions, in attempt order
    pub engines: Vec<Engine>,
    pub post_endpoint: String,
    pub key_location: Option<String>,
    pub get_timeout: Duration,
    pub post_timeout: Duration,
    pub vendor_timeout: Duration,
    pub vendor_publish_endpoint: String,
    pub vendor_scope: String,
    /// Delay between consecutive URLs of a batch
    pub pacing_delay: Duration,
}

impl SubmissionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            engines: config.indexnow.engines.iter().map(Engine::from).collect(),
            post_endpoint: config.indexnow.post_endpoint.clone(),
            key_location: config.indexnow.key_location.clone(),
            get_timeout: Duration::from_secs(config.submission.get_timeout_secs),
            post_timeout: Duration::from_secs(config.submission.post_timeout_secs),
            vendor_timeout: Duration::from_secs(config.submission.vendor_timeout_secs),
            vendor_publish_endpoint: config.vendor.publish_endpoint.clone(),
            vendor_scope: config.vendor.scope.clone(),
            pacing_delay: Duration::from_millis(config.submission.pacing_delay_ms),
        }
    }
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// IndexNow endpoints answer 200 or 202 when a submission is taken
pub fn is_accepted_status(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::ACCEPTED
}

/// Formats the user agent sent with every submission
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!("Mozilla/5.0 (compatible; {}/{})", config.name, config.version)
}

/// Builds the HTTP client used by all submission methods
///
/// Per-request timeouts are applied by each method; the client only bounds
/// connection setup.
///
/// # Example
///
/// ```no_run
/// use index_courier::config::UserAgentConfig;
/// use index_courier::submit::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}
