use crate::config::types::Config;
use crate::config::validation::validate;
use crate::submit::VendorCredentials;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use index_courier::config::load_config;
///
/// let config = load_config(Path::new("courier.toml")).unwrap();
/// println!("Pacing delay: {}ms", config.submission.pacing_delay_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored with every persisted batch so history rows can be traced back to
/// the configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Reads a service-account JSON file for the vendor indexing API
///
/// Only checks that the file holds a JSON object; the fields are
/// interpreted by the vendor submission method itself.
pub fn load_vendor_credentials(path: &Path) -> Result<VendorCredentials, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| ConfigError::Credentials(format!("{}: {}", path.display(), e)))?;

    if !value.is_object() {
        return Err(ConfigError::Credentials(format!(
            "{}: expected a JSON object",
            path.display()
        )));
    }

    Ok(VendorCredentials::new(value))
}
