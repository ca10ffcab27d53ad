use crate::config::types::{
    Config, EngineEntry, IndexNowConfig, OutputConfig, ServerConfig, SubmissionConfig,
    UserAgentConfig, VendorConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Longest pacing delay accepted between two URLs of a batch
const MAX_PACING_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_submission_config(&config.submission)?;
    validate_indexnow_config(&config.indexnow)?;
    validate_vendor_config(&config.vendor)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates pacing and timeout settings
fn validate_submission_config(config: &SubmissionConfig) -> Result<(), ConfigError> {
    if config.pacing_delay_ms > MAX_PACING_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "pacing_delay_ms must be <= {}ms, got {}ms",
            MAX_PACING_DELAY_MS, config.pacing_delay_ms
        )));
    }

    for (name, value) in [
        ("get_timeout_secs", config.get_timeout_secs),
        ("post_timeout_secs", config.post_timeout_secs),
        ("vendor_timeout_secs", config.vendor_timeout_secs),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got 0",
                name
            )));
        }
    }

    Ok(())
}

/// Validates IndexNow endpoints and the optional default key
fn validate_indexnow_config(config: &IndexNowConfig) -> Result<(), ConfigError> {
    if let Some(key) = &config.key {
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "indexnow key cannot be blank when set".to_string(),
            ));
        }
    }

    if let Some(location) = &config.key_location {
        validate_http_url("key-location", location)?;
    }

    validate_http_url("post-endpoint", &config.post_endpoint)?;
    validate_engines(&config.engines)?;

    Ok(())
}

fn validate_engines(engines: &[EngineEntry]) -> Result<(), ConfigError> {
    if engines.is_empty() {
        return Err(ConfigError::Validation(
            "at least one IndexNow engine must be configured".to_string(),
        ));
    }

    for engine in engines {
        if engine.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "engine with endpoint '{}' has an empty name",
                engine.endpoint
            )));
        }
        validate_http_url(&format!("engine '{}'", engine.name), &engine.endpoint)?;
    }

    Ok(())
}

fn validate_vendor_config(config: &VendorConfig) -> Result<(), ConfigError> {
    validate_http_url("publish-endpoint", &config.publish_endpoint)?;

    if config.scope.is_empty() {
        return Err(ConfigError::Validation("vendor scope cannot be empty".to_string()));
    }

    if let Some(path) = &config.credentials_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "credentials_path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind_address '{}' is not a socket address: {}",
            config.bind_address, e
        ))
    })?;

    Ok(())
}

/// Checks that a configured endpoint parses and uses an HTTP(S) scheme
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
