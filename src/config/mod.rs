//! Configuration module for Index-Courier
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file is a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use index_courier::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("courier.toml")).unwrap();
//! println!("Engines: {}", config.indexnow.engines.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, EngineEntry, IndexNowConfig, OutputConfig, ServerConfig, SubmissionConfig,
    UserAgentConfig, VendorConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_vendor_credentials,
    parse_config,
};
