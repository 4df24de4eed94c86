//! Configuration module for the Octoroute runtime.
//!
//! This module provides layered (file + environment) configuration loading and
//! validation for logging and hook-module selection.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    HooksConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, OctorouteConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
