use crate::config::types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on extractions in flight
const MAX_CONCURRENT_EXTRACTIONS: u32 = 100;

/// Lower bound for both request and connect timeouts (milliseconds)
const MIN_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_extractions < 1
        || config.max_concurrent_extractions > MAX_CONCURRENT_EXTRACTIONS
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_extractions must be between 1 and {}, got {}",
            MAX_CONCURRENT_EXTRACTIONS, config.max_concurrent_extractions
        )));
    }

    if config.request_timeout < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.request_timeout
        )));
    }

    if config.connect_timeout < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.rate_limit_rpm < 1 {
        return Err(ConfigError::Validation(format!(
            "rate_limit_rpm must be >= 1, got {}",
            config.rate_limit_rpm
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
