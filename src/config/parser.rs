use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Overrides `server.port`
pub const ENV_PORT: &str = "PORT";

/// Overrides `crawler.max-concurrent-extractions`
pub const ENV_CONCURRENT_LIMIT: &str = "EXTRACTOR_CONCURRENT_LIMIT";

/// Overrides `server.rate-limit-rpm`
pub const ENV_RATE_LIMIT_RPM: &str = "RATE_LIMIT_RPM";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied after parsing and before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Builds the default configuration with environment overrides applied
pub fn load_default_config() -> Result<Config, ConfigError> {
    let mut config = Config::default();

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables
///
/// Unset variables leave the config untouched; set but unparsable ones are
/// an error rather than being silently ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_env(&lookup, ENV_PORT)? {
        config.server.port = port;
    }

    if let Some(limit) = parse_env(&lookup, ENV_CONCURRENT_LIMIT)? {
        config.crawler.max_concurrent_extractions = limit;
    }

    if let Some(rpm) = parse_env(&lookup, ENV_RATE_LIMIT_RPM)? {
        config.server.rate_limit_rpm = rpm;
    }

    Ok(())
}

fn parse_env<F, T>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Env {
                name: name.to_string(),
                value,
            }),
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a crawl can be traced back to the exact config used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
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
