//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{HooksConfig, LogFormat, LogOutput, LoggingConfig, OctorouteConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &OctorouteConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_hooks_config(&config.hooks)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "logging.format = \"json\" requires the `json-log` feature",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty() || m.contains('=')) {
        return Err(ConfigError::validation(format!(
            "Invalid module name in logging.filters: '{module}'"
        )));
    }

    Ok(())
}

fn validate_hooks_config(hooks: &HooksConfig) -> ConfigResult<()> {
    for (list, names) in [("hooks.enabled", &hooks.enabled), ("hooks.disabled", &hooks.disabled)] {
        let mut seen = HashSet::new();
        for name in names {
            if name.trim().is_empty() {
                return Err(ConfigError::validation(format!("Empty module name in {list}")));
            }
            if !seen.insert(name) {
                return Err(ConfigError::validation(format!(
                    "Duplicate module '{name}' in {list}"
                )));
            }
        }
    }

    if let Some(name) = hooks.enabled.iter().find(|n| hooks.disabled.contains(n)) {
        return Err(ConfigError::validation(format!(
            "Module '{name}' is both enabled and disabled"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&OctorouteConfig::default()).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = OctorouteConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { field }) if field == "logging.file_path"
        ));

        config.logging.file_path = Some(PathBuf::from("logs/octoroute.log"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter_module() {
        let mut config = OctorouteConfig::default();
        config
            .logging
            .filters
            .insert("octoroute=debug".into(), Default::default());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_contradictory_hook_lists() {
        let mut config = OctorouteConfig::default();
        config.hooks.enabled = vec!["labels".into()];
        config.hooks.disabled = vec!["labels".into()];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let mut config = OctorouteConfig::default();
        config.hooks.disabled = vec!["labels".into(), "labels".into()];
        assert!(validate_config(&config).is_err());

        config.hooks.disabled = vec![" ".into()];
        assert!(validate_config(&config).is_err());
    }

    #[cfg(not(feature = "json-log"))]
    #[test]
    fn test_json_format_requires_feature() {
        let mut config = OctorouteConfig::default();
        config.logging.format = LogFormat::Json;
        assert!(validate_config(&config).is_err());
    }
}
