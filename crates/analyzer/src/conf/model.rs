//! Model — AnalyzerConfig and related structs.

use serde::{Deserialize, Serialize};

use crate::filter::{FilterMode, RowColumn};

pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub input_path: Option<String>,
    pub output: OutputFormat,
    pub include_verbose: bool,
    /// Bound on raw lines buffered between the reader task and the session.
    pub channel_capacity: usize,
    pub filter: RowFilterConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Row filter applied to the table before rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowFilterConfig {
    pub pattern: Option<String>,
    pub case_sensitive: bool,
    pub mode: FilterMode,
    pub column: RowColumn,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input_path: None,
            output: OutputFormat::Text,
            include_verbose: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            filter: RowFilterConfig::default(),
        }
    }
}

impl RowFilterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.pattern.as_deref(), Some(p) if p.is_empty()) {
            return Err("filter.pattern must not be empty when set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_config_defaults() {
        let cfg = AnalyzerConfig::default();
        assert!(cfg.input_path.is_none());
        assert_eq!(cfg.output, OutputFormat::Text);
        assert!(cfg.include_verbose);
        assert_eq!(cfg.channel_capacity, 1024);
        assert!(cfg.filter.pattern.is_none());
        assert_eq!(cfg.filter.mode, FilterMode::Include);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_filter_validate_rejects_empty_pattern() {
        let filter = RowFilterConfig {
            pattern: Some(String::new()),
            ..Default::default()
        };
        let err = filter.validate().unwrap_err();
        assert!(err.contains("filter.pattern"), "{}", err);
        assert!(RowFilterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let toml_str = r#"
            output = "json"

            [filter]
            pattern = "sso"
            mode = "exclude"
            column = "message"
        "#;
        let cfg: AnalyzerConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.channel_capacity, 1024); // default
        assert!(cfg.include_verbose); // default
        assert_eq!(cfg.filter.pattern.as_deref(), Some("sso"));
        assert_eq!(cfg.filter.mode, FilterMode::Exclude);
        assert_eq!(cfg.filter.column, RowColumn::Message);
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = AnalyzerConfig {
            input_path: Some("logs.txt".to_string()),
            output: OutputFormat::Json,
            ..Default::default()
        };
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let back: AnalyzerConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(back.input_path, cfg.input_path);
        assert_eq!(back.output, cfg.output);
        assert_eq!(back.channel_capacity, cfg.channel_capacity);
    }
}
