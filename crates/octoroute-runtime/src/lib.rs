//! Octoroute Runtime - configuration, logging and hook-module setup.
//!
//! This crate provides:
//! - Layered configuration (`ConfigLoader`, `OctorouteConfig`)
//! - Logging configuration (`LoggingBuilder`)
//! - The [`Octoroute`] entry point that loads [`HookModule`]s into a registry
//!
//! ```rust,ignore
//! use octoroute_runtime::Octoroute;
//!
//! let octoroute = Octoroute::builder()
//!     .config_file("octoroute.toml")
//!     .build()?;
//!
//! octoroute.setup(&[LABELS])?;
//! octoroute.dispatch("label", &payload);
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "pretty"
//!
//! [logging.filters]
//! octoroute_framework = "trace"
//!
//! [hooks]
//! disabled = ["experimental"]
//! ```
//!
//! [`HookModule`]: octoroute_framework::HookModule

pub mod config;
pub mod error;
pub mod logging;
pub mod setup;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, HooksConfig, LoggingConfig, OctorouteConfig, Profile,
};
pub use error::{SetupError, SetupResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use setup::{Octoroute, OctorouteBuilder, SetupSummary};

// Re-export tracing for use in handlers
pub use tracing;
