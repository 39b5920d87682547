//! arbiter.toml configuration parser.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Policy selected when the config does not name one.
pub const DEFAULT_POLICY: &str = "proportion";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArbiterConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Name of the allocation policy to run.
    #[serde(default = "default_policy")]
    pub policy: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info,arbiter_policy=debug"`.
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_policy() -> String {
    DEFAULT_POLICY.to_string()
}

fn default_filter() -> String {
    "info".to_string()
}

impl ArbiterConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = ArbiterConfig::from_toml_str("").unwrap();
        assert_eq!(config, ArbiterConfig::default());
        assert_eq!(config.scheduler.policy, "proportion");
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parses_all_sections() {
        let toml_str = r#"
[scheduler]
policy = "custom"

[logging]
filter = "debug"
format = "json"
"#;
        let config = ArbiterConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.scheduler.policy, "custom");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let config = ArbiterConfig::from_toml_str("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.scheduler.policy, DEFAULT_POLICY);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = ArbiterConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, CoreError::Toml(_)));
    }

    #[test]
    fn renders_back_to_toml() {
        let toml_str = ArbiterConfig::default().to_toml_string().unwrap();
        assert!(toml_str.contains("policy = \"proportion\""));
        assert!(toml_str.contains("format = \"text\""));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ArbiterConfig::from_file(Path::new("/nonexistent/arbiter.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/arbiter.toml"));
    }
}
