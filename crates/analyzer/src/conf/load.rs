//! Load — config loading from file and environment variables.

use std::path::Path;

use thiserror::Error;

use super::model::{AnalyzerConfig, OutputFormat, DEFAULT_CHANNEL_CAPACITY};
use crate::filter::FilterMode;

pub const DEFAULT_CONFIG_FILE: &str = "analyzer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl AnalyzerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("ANALYZER_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!(path = %config_path, "loading configuration from file");
            Self::from_file(&config_path)?
        } else {
            tracing::info!(path = %config_path, "config file not found, using environment variables");
            Self::from_env()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            include_verbose: lookup("ANALYZER_INCLUDE_VERBOSE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            channel_capacity: lookup("ANALYZER_CHANNEL_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
            ..Default::default()
        };
        config.input_path = lookup("ANALYZER_INPUT");
        config.output = lookup("ANALYZER_OUTPUT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(OutputFormat::Text);
        config.filter.pattern = lookup("ANALYZER_FILTER");
        config
    }

    /// Environment values win over whatever the file said. Unlike
    /// `from_env`, a malformed value here is an error rather than a default.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(input) = lookup("ANALYZER_INPUT") {
            self.input_path = Some(input);
        }
        if let Some(output) = lookup("ANALYZER_OUTPUT") {
            self.output = output.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(verbose) = lookup("ANALYZER_INCLUDE_VERBOSE") {
            self.include_verbose = verbose.parse().map_err(|_| {
                ConfigError::Invalid(format!("ANALYZER_INCLUDE_VERBOSE is not a bool: {}", verbose))
            })?;
        }
        if let Some(capacity) = lookup("ANALYZER_CHANNEL_CAPACITY") {
            self.channel_capacity = capacity.parse().map_err(|_| {
                ConfigError::Invalid(format!("ANALYZER_CHANNEL_CAPACITY is not a number: {}", capacity))
            })?;
        }
        if let Some(pattern) = lookup("ANALYZER_FILTER") {
            self.filter.pattern = Some(pattern);
        }
        if let Some(mode) = lookup("ANALYZER_FILTER_MODE") {
            self.filter.mode = match mode.to_ascii_lowercase().as_str() {
                "include" => FilterMode::Include,
                "exclude" => FilterMode::Exclude,
                other => {
                    return Err(ConfigError::Invalid(format!("unknown filter mode: {}", other)))
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be > 0".to_string()));
        }
        self.filter.validate().map_err(ConfigError::Invalid)
    }
}
