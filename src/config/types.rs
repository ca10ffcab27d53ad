use serde::Deserialize;

/// Main configuration structure for Index-Courier
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub indexnow: IndexNowConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Pacing and timeout settings for the submission pipeline
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    /// Delay inserted between consecutive URLs of a batch (milliseconds)
    #[serde(rename = "pacing-delay-ms", default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,

    /// Per-engine timeout for IndexNow GET submissions (seconds)
    #[serde(rename = "get-timeout-secs", default = "default_get_timeout_secs")]
    pub get_timeout_secs: u64,

    /// Timeout for the centralized IndexNow POST submission (seconds)
    #[serde(rename = "post-timeout-secs", default = "default_post_timeout_secs")]
    pub post_timeout_secs: u64,

    /// Timeout for each vendor API call (token exchange, publish)
    #[serde(rename = "vendor-timeout-secs", default = "default_vendor_timeout_secs")]
    pub vendor_timeout_secs: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: default_pacing_delay_ms(),
            get_timeout_secs: default_get_timeout_secs(),
            post_timeout_secs: default_post_timeout_secs(),
            vendor_timeout_secs: default_vendor_timeout_secs(),
        }
    }
}

/// IndexNow protocol configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexNowConfig {
    /// Deployment-level key used when a request does not supply one
    #[serde(default)]
    pub key: Option<String>,

    /// Override for the key-location URL sent with POST submissions
    #[serde(rename = "key-location", default)]
    pub key_location: Option<String>,

    /// Centralized endpoint for POST submissions
    #[serde(rename = "post-endpoint", default = "default_post_endpoint")]
    pub post_endpoint: String,

    /// Engines contacted, in order, by GET submissions
    #[serde(default = "default_engines")]
    pub engines: Vec<EngineEntry>,
}

impl Default for IndexNowConfig {
    fn default() -> Self {
        Self {
            key: None,
            key_location: None,
            post_endpoint: default_post_endpoint(),
            engines: default_engines(),
        }
    }
}

/// One participating IndexNow search engine
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineEntry {
    /// Display name used in outcome messages
    pub name: String,

    /// Engine's IndexNow endpoint
    pub endpoint: String,
}

/// Vendor indexing API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    /// Service-account JSON used when a request does not carry credentials
    #[serde(rename = "credentials-path", default)]
    pub credentials_path: Option<String>,

    /// URL-notification publish endpoint
    #[serde(rename = "publish-endpoint", default = "default_publish_endpoint")]
    pub publish_endpoint: String,

    /// OAuth scope requested for the access token
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            credentials_path: None,
            publish_endpoint: default_publish_endpoint(),
            scope: default_scope(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite history database
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_pacing_delay_ms() -> u64 {
    500
}

fn default_get_timeout_secs() -> u64 {
    10
}

fn default_post_timeout_secs() -> u64 {
    15
}

fn default_vendor_timeout_secs() -> u64 {
    30
}

fn default_post_endpoint() -> String {
    "https://api.indexnow.org/indexnow".to_string()
}

fn default_engines() -> Vec<EngineEntry> {
    vec![
        EngineEntry {
            name: "Bing".to_string(),
            endpoint: "https://www.bing.com/indexnow".to_string(),
        },
        EngineEntry {
            name: "Yandex".to_string(),
            endpoint: "https://yandex.com/indexnow".to_string(),
        },
    ]
}

fn default_publish_endpoint() -> String {
    "https://indexing.googleapis.com/v3/urlNotifications:publish".to_string()
}

fn default_scope() -> String {
    "https://www.googleapis.com/auth/indexing".to_string()
}

fn default_agent_name() -> String {
    "IndexerBot".to_string()
}

fn default_agent_version() -> String {
    "1.0".to_string()
}

fn default_database_path() -> String {
    "./index-courier.db".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}
