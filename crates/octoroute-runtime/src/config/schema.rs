//! Configuration schema definitions.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "pretty"
//! output = "file"
//! file_path = "logs/octoroute.log"
//! rotation = "daily"
//!
//! [logging.filters]
//! octoroute_framework = "trace"
//!
//! [hooks]
//! disabled = ["experimental"]
//! strict = true
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctorouteConfig {
    pub logging: LoggingConfig,
    pub hooks: HooksConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level.
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Log file path, required when `output = "file"`.
    pub file_path: Option<PathBuf>,
    /// Rotation policy for file output.
    pub rotation: LogRotation,
    /// Include thread IDs in log lines.
    pub thread_ids: bool,
    /// Include source file and line number in log lines.
    pub file_location: bool,
    pub span_events: SpanEventConfig,
    /// Per-module level overrides, e.g. `octoroute_framework = "trace"`.
    pub filters: BTreeMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            rotation: LogRotation::Never,
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
            filters: BTreeMap::new(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Rotation policy for file output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

// =============================================================================
// Hooks
// =============================================================================

/// Selection of the hook modules loaded by `Octoroute::setup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Modules to load. Empty means every module passed to setup.
    pub enabled: Vec<String>,
    /// Modules to skip, applied after `enabled`.
    pub disabled: Vec<String>,
    /// Fail setup when `enabled` or `disabled` names a module that was not
    /// passed to setup.
    pub strict: bool,
}

impl HooksConfig {
    /// Returns `true` if the module called `name` should be loaded.
    pub fn is_enabled(&self, name: &str) -> bool {
        let allowed = self.enabled.is_empty() || self.enabled.iter().any(|m| m == name);
        allowed && !self.disabled.iter().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OctorouteConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.output, LogOutput::Stdout);
        assert!(config.hooks.enabled.is_empty());
        assert!(!config.hooks.strict);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OctorouteConfig = serde_json::from_value(serde_json::json!({
            "logging": { "level": "debug", "filters": { "octoroute_framework": "trace" } },
            "hooks": { "disabled": ["labels"] }
        }))
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.filters["octoroute_framework"], LogLevel::Trace);
        assert_eq!(config.hooks.disabled, vec!["labels".to_string()]);
    }

    #[test]
    fn test_hook_module_selection() {
        let all = HooksConfig::default();
        assert!(all.is_enabled("labels"));

        let allow = HooksConfig {
            enabled: vec!["labels".into()],
            ..Default::default()
        };
        assert!(allow.is_enabled("labels"));
        assert!(!allow.is_enabled("pushes"));

        let deny = HooksConfig {
            disabled: vec!["reviews".into()],
            ..Default::default()
        };
        assert!(deny.is_enabled("labels"));
        assert!(!deny.is_enabled("reviews"));
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }
}
