//! Configuration management for BlogForge
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! The generation API key additionally falls back to `GOOGLE_API_KEY`.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Conventional environment variable holding the Gemini API key
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Longest accepted session lifetime (ten years)
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Generative-language service configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Session authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (sqlite:// or postgres://)
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

/// Prompt template used when asking the model for an article
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    /// Structure only
    Plain,
    /// Structure plus headings, emphasis and lists
    #[default]
    Markdown,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Generation provider: gemini, mock
    #[serde(default = "default_generation_provider")]
    pub provider: String,

    /// API key for the generation service
    pub api_key: Option<String>,

    /// API base URL
    #[serde(default = "default_generation_api_base")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    /// Prompt template
    #[serde(default)]
    pub template: PromptStyle,
}

impl GenerationConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    pub session_secret: Option<String>,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Session cookie name
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure`
    #[serde(default)]
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Install the Prometheus recorder and serve /metrics
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,

    /// Service name for logs
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_database_url() -> String { "sqlite://blogforge.db?mode=rwc".to_string() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_generation_provider() -> String { "gemini".to_string() }
fn default_generation_api_base() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_generation_model() -> String { crate::DEFAULT_GENERATION_MODEL.to_string() }
fn default_generation_timeout() -> u64 { 60 }
fn default_session_ttl() -> u64 { 7 * 24 * 3600 }
fn default_cookie_name() -> String { "session".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_enabled() -> bool { true }
fn default_service_name() -> String { "blogforge".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Single-connection in-memory SQLite database, used by tests and demos
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Self::default()
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            api_key: None,
            api_base: default_generation_api_base(),
            model: default_generation_model(),
            timeout_secs: default_generation_timeout(),
            template: PromptStyle::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: None,
            session_ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_enabled: default_metrics_enabled(),
            service_name: default_service_name(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.apply_api_key_fallback(std::env::var(GOOGLE_API_KEY_VAR).ok());
        config.validate()?;
        Ok(config)
    }

    /// Use `key` as the generation API key unless one is already configured
    fn apply_api_key_fallback(&mut self, key: Option<String>) {
        if self.generation.api_key.is_none() {
            self.generation.api_key = key.filter(|k| !k.trim().is_empty());
        }
    }

    /// Reject values that deserialize but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ttl = self.auth.session_ttl_secs;
        if ttl == 0 || ttl > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Message(format!(
                "auth.session_ttl_secs must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECS, ttl
            )));
        }
        Ok(())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.model, "gemini-pro");
        assert_eq!(config.generation.template, PromptStyle::Markdown);
        assert_eq!(config.auth.cookie_name, "session");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_api_key_fallback() {
        let mut config = AppConfig::default();
        config.apply_api_key_fallback(Some("from-env".to_string()));
        assert_eq!(config.generation.api_key.as_deref(), Some("from-env"));

        // An explicitly configured key wins
        config.apply_api_key_fallback(Some("other".to_string()));
        assert_eq!(config.generation.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let mut config = AppConfig::default();
        config.apply_api_key_fallback(Some("  ".to_string()));
        assert!(config.generation.api_key.is_none());
    }

    #[test]
    fn test_partial_sections_deserialize() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "generation": { "template": "plain" }
        }))
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.generation.template, PromptStyle::Plain);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_session_ttl_bounds() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.auth.session_ttl_secs = 0;
        assert!(config.validate().is_err());

        config.auth.session_ttl_secs = u64::MAX;
        assert!(config.validate().is_err());

        config.auth.session_ttl_secs = MAX_SESSION_TTL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generation_timeout() {
        let config = GenerationConfig {
            timeout_secs: 5,
            ..GenerationConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
