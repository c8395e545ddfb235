use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use glucolog_core::{ApiClient, FetchOrdering, FileStore, DEFAULT_API_URL};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the backend
    pub api_url: ConfigValue<String>,
    /// Directory holding session.json
    pub data_dir: ConfigValue<PathBuf>,
    /// Prefix added to 10-digit phone numbers
    pub country_code: ConfigValue<String>,
    /// Discard responses from fetches that were overtaken by a newer one
    pub sequenced_fetches: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    country_code: Option<String>,
    sequenced_fetches: Option<bool>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut api_url = ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default);
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut country_code =
            ConfigValue::new(DEFAULT_COUNTRY_CODE.to_string(), ConfigSource::Default);
        let mut sequenced_fetches = ConfigValue::new(false, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_url {
                api_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(code) = file_config.country_code {
                country_code = ConfigValue::new(code, ConfigSource::File);
            }
            if let Some(sequenced) = file_config.sequenced_fetches {
                sequenced_fetches = ConfigValue::new(sequenced, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("GLUCOLOG_API_URL") {
            api_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("GLUCOLOG_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(code) = std::env::var("GLUCOLOG_COUNTRY_CODE") {
            country_code = ConfigValue::new(code, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("GLUCOLOG_SEQUENCED_FETCHES") {
            let value = parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidEnv("GLUCOLOG_SEQUENCED_FETCHES".to_string(), raw.clone())
            })?;
            sequenced_fetches = ConfigValue::new(value, ConfigSource::Environment);
        }

        Ok(Self {
            api_url,
            data_dir,
            country_code,
            sequenced_fetches,
            config_file,
        })
    }

    pub fn fetch_ordering(&self) -> FetchOrdering {
        if self.sequenced_fetches.value {
            FetchOrdering::LatestRequest
        } else {
            FetchOrdering::LastResolved
        }
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(self.api_url.value.clone())
    }

    pub fn session_store(&self) -> FileStore {
        FileStore::in_dir(&self.data_dir.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/glucolog/
    /// - macOS: ~/Library/Application Support/glucolog/
    /// - Windows: %APPDATA%/glucolog/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glucolog")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/glucolog/
    /// - macOS: ~/Library/Application Support/glucolog/
    /// - Windows: %APPDATA%/glucolog/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glucolog")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(name, value) => {
                write!(f, "Invalid value '{}' for {}: expected true or false", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Held by tests that load config, so GLUCOLOG_* overrides set by one test
/// are not seen by another.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
