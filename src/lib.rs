//! Index-Courier: search-engine URL submission
//!
//! This crate submits lists of URLs to search-engine indexing services (a
//! credentialed vendor indexing API and the multi-engine IndexNow protocol),
//! records the outcome of every attempt, and keeps a queryable history.

pub mod config;
pub mod output;
pub mod server;
pub mod storage;
pub mod submit;
pub mod url;

use thiserror::Error;

/// Main error type for Index-Courier operations
#[derive(Debug, Error)]
pub enum CourierError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Submission rejected: {0}")]
    Submit(#[from] SubmitError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid credentials file: {0}")]
    Credentials(String),
}

/// Rejections raised to the caller before or instead of a batch run
///
/// Per-method failures are never reported through this type; they are
/// recorded as failed outcomes inside the batch results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Indexing already in progress")]
    Busy,

    #[error("No valid URLs provided (must start with http:// or https://)")]
    NoValidUrls,

    #[error("Google API requested but no credentials provided")]
    MissingVendorCredentials,
}

/// Result type alias for Index-Courier operations
pub type Result<T> = std::result::Result<T, CourierError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use submit::{
    BatchReport, BatchRequest, BatchRunner, BatchSummary, OutcomeStatus, SubmissionMethod,
    SubmissionOutcome, UrlResult,
};
pub use crate::url::{validate_unique_urls, validate_urls};
