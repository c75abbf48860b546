//! Configuration file discovery and writing.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api_keys]
//! gemini = "your-gemini-key"
//! news = "your-newsapi-key"
//!
//! [answer]
//! model = "gemini-pro"
//! endpoint = "https://generativelanguage.googleapis.com/v1beta"
//!
//! [news]
//! endpoint = "https://newsapi.org/v2"
//! page_size = 4
//! language = "en"
//! sort_by = "relevancy"
//!
//! [render]
//! default_language = "javascript"
//!
//! [http]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [retry]
//! max_attempts = 1
//! initial_delay_ms = 500
//! max_delay_ms = 8000
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory and the config dir
pub const CONFIG_FILE_NAME: &str = "answer-engine.toml";

/// Platform config location (e.g. `~/.config/answer-engine/answer-engine.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("answer-engine").join(CONFIG_FILE_NAME))
}

/// Find the first existing config file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Write a configuration to a TOML file, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Config file already exists: {0}")]
    AlreadyExists(String),
}
