//! Configuration management.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults (API keys default to `GEMINI_API_KEY` / `NEWS_API_KEY`)
//! 2. A TOML file (`--config`, `./answer-engine.toml`, or the platform config dir)
//! 3. `ANSWER_ENGINE_*` environment variables, with `__` between section and key
//!    (e.g. `ANSWER_ENGINE_NEWS__PAGE_SIZE=8`)

mod file_config;

pub use file_config::{
    default_config_path, find_config_file, save_config, ConfigFileError, CONFIG_FILE_NAME,
};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::DEFAULT_CODE_LANGUAGE;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "ANSWER_ENGINE";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API keys for the upstream providers
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Answer provider settings
    #[serde(default)]
    pub answer: AnswerConfig,

    /// News provider settings
    #[serde(default)]
    pub news: NewsConfig,

    /// Document rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry policy applied around provider calls
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Config {
    /// Defaults without any API keys, suitable for writing to disk
    pub fn template() -> Self {
        Self {
            api_keys: ApiKeys {
                gemini: None,
                news: None,
            },
            ..Self::default()
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Google Generative Language API key
    #[serde(default = "env_gemini_key")]
    pub gemini: Option<String>,

    /// NewsAPI key
    #[serde(default = "env_news_key")]
    pub news: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            gemini: env_gemini_key(),
            news: env_news_key(),
        }
    }
}

fn env_gemini_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY").ok()
}

fn env_news_key() -> Option<String> {
    std::env::var("NEWS_API_KEY").ok()
}

/// Answer provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerConfig {
    /// Model name passed to `generateContent`
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the Generative Language API
    #[serde(default = "default_answer_endpoint")]
    pub endpoint: String,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_answer_endpoint(),
        }
    }
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_answer_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// News provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Base URL of the NewsAPI service
    #[serde(default = "default_news_endpoint")]
    pub endpoint: String,

    /// Number of articles to request
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Article language filter
    #[serde(default = "default_news_language")]
    pub language: String,

    /// NewsAPI sort order (relevancy, popularity, publishedAt)
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_news_endpoint(),
            page_size: default_page_size(),
            language: default_news_language(),
            sort_by: default_sort_by(),
        }
    }
}

fn default_news_endpoint() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_page_size() -> usize {
    4
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_sort_by() -> String {
    "relevancy".to_string()
}

/// Document rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Language assumed for code fences without a tag
    #[serde(default = "default_code_language")]
    pub default_language: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_language: default_code_language(),
        }
    }
}

fn default_code_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl HttpConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Retry policy configuration (1 attempt means no retry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per provider call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for the backoff delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}

/// `ANSWER_ENGINE_*` overrides, e.g. `ANSWER_ENGINE_NEWS__PAGE_SIZE=8`
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration when no file is used: defaults plus environment overrides
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}
