use serde::Deserialize;

/// Main configuration structure for Domain-Crawler
///
/// Every section has defaults, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub server: ServerConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of extractions in flight at once
    #[serde(rename = "max-concurrent-extractions")]
    pub max_concurrent_extractions: u32,

    /// Total time allowed for one origin request (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Time allowed to establish a connection (milliseconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: 2,
            request_timeout: 30_000,
            connect_timeout: 10_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "DomainCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/domain-crawler".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// HTTP surface configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Requests each client IP may make per minute
    #[serde(rename = "rate-limit-rpm")]
    pub rate_limit_rpm: u32,
}

impl ServerConfig {
    /// Returns the `host:port` bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            rate_limit_rpm: 60,
        }
    }
}
