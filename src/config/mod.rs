use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::logging::LoggingConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub fetcher: FetcherConfig,
    pub research: ResearchConfig,
    pub cache: CacheConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub requests_per_minute: u32,
    pub max_results_per_query: usize,
    /// Fetch full page bodies for relevant hits in addition to snippets.
    pub fetch_page_bodies: bool,
    pub content_max_chars: usize,
    /// Domains worth a full page fetch (registries, encyclopedias,
    /// profile sites).
    pub relevant_domains: Vec<String>,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub jitter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Aspect pipelines allowed to run at the same time.
    pub max_concurrent_aspects: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            research: ResearchConfig::default(),
            cache: CacheConfig::default(),
            export: ExportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_seconds: 30,
            requests_per_minute: 20,
            max_results_per_query: 5,
            fetch_page_bodies: true,
            content_max_chars: 1000,
            relevant_domains: vec![
                "registroimprese.it".to_string(),
                "infocamere.it".to_string(),
                "ufficiocamerale.it".to_string(),
                "linkedin.com".to_string(),
                "crunchbase.com".to_string(),
                "wikipedia.org".to_string(),
            ],
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            jitter: true,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self { max_concurrent_aspects: 3 }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 3600,
            max_entries: 1000,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            output_directory: get_data_directory().join("exports"),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, creating it with
    /// defaults on first run.
    pub async fn load() -> Result<Self> {
        let config_path = get_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            info!("No configuration file found, using defaults");
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub async fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;

        ConfigOverrides::apply(&mut config);
        config.validate()?;

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_path = get_config_path();

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(&config_path, content).await?;

        info!("Configuration saved to: {}", config_path.display());
        Ok(())
    }

    /// Validate configuration values. Fails fast at startup, before any
    /// per-company work begins.
    pub fn validate(&self) -> crate::error::ResearchResult<()> {
        use crate::error::ResearchError;

        if self.fetcher.user_agent.trim().is_empty() {
            return Err(ResearchError::config("fetcher user_agent must not be empty"));
        }

        if self.fetcher.request_timeout_seconds == 0 {
            return Err(ResearchError::config("fetcher request_timeout_seconds must be > 0"));
        }

        if self.fetcher.max_results_per_query == 0 {
            return Err(ResearchError::config("fetcher max_results_per_query must be > 0"));
        }

        if self.fetcher.retry.max_attempts == 0 {
            return Err(ResearchError::config("retry max_attempts must be > 0"));
        }

        if self.research.max_concurrent_aspects == 0 {
            return Err(ResearchError::config("research max_concurrent_aspects must be > 0"));
        }

        if self.cache.max_entries == 0 {
            return Err(ResearchError::config("cache max_entries must be > 0"));
        }

        Ok(())
    }
}

/// Get the default data directory
fn get_data_directory() -> PathBuf {
    directories::ProjectDirs::from("com", "impresascope", "impresascope")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("data"))
}

/// Get the configuration file path
fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "impresascope", "impresascope")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default().join("config.toml"))
}

/// Environment-based configuration overrides
pub struct ConfigOverrides;

impl ConfigOverrides {
    /// Apply environment variable overrides to configuration
    pub fn apply(config: &mut AppConfig) {
        if let Ok(agent) = std::env::var("IMPRESA_USER_AGENT") {
            config.fetcher.user_agent = agent;
        }

        if let Ok(rpm_str) = std::env::var("IMPRESA_REQUESTS_PER_MINUTE") {
            if let Ok(rpm) = rpm_str.parse::<u32>() {
                config.fetcher.requests_per_minute = rpm;
            }
        }

        if let Ok(concurrent_str) = std::env::var("IMPRESA_CONCURRENT_ASPECTS") {
            if let Ok(concurrent) = concurrent_str.parse::<usize>() {
                config.research.max_concurrent_aspects = concurrent;
            }
        }

        if let Ok(ttl_str) = std::env::var("IMPRESA_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl_str.parse::<u64>() {
                config.cache.ttl_seconds = ttl;
            }
        }

        if let Ok(cache_str) = std::env::var("IMPRESA_CACHE_ENABLED") {
            config.cache.enabled = cache_str.to_lowercase() == "true";
        }

        if let Ok(log_level) = std::env::var("IMPRESA_LOG_LEVEL") {
            config.logging.level = log_level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let mut config = AppConfig::default();
        config.research.max_concurrent_aspects = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_user_agent() {
        let mut config = AppConfig::default();
        config.fetcher.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.fetcher.requests_per_minute, config.fetcher.requests_per_minute);
        assert_eq!(parsed.cache.ttl_seconds, config.cache.ttl_seconds);
        assert_eq!(parsed.research.max_concurrent_aspects, 3);
    }
}
