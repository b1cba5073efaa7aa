//! Configuration module for Domain-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and overlaying the environment variables a deployment may set.
//!
//! # Example
//!
//! ```no_run
//! use domain_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!(
//!     "Extractions in flight: {}",
//!     config.crawler.max_concurrent_extractions
//! );
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    load_default_config, ENV_CONCURRENT_LIMIT, ENV_PORT, ENV_RATE_LIMIT_RPM,
};
pub use validation::validate;
