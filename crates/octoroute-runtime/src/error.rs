//! Runtime error types.

use octoroute_framework::RegistrationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building the runtime or loading hook modules.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A hook in a module was rejected by the registry.
    #[error("Failed to register hook module '{module}': {source}")]
    Registration {
        module: &'static str,
        #[source]
        source: RegistrationError,
    },

    /// Strict mode: the hooks config names a module that was not offered.
    #[error("Unknown hook module '{name}' in hooks config (available: {available})")]
    UnknownModule { name: String, available: String },
}

impl SetupError {
    pub fn registration(module: &'static str, source: RegistrationError) -> Self {
        Self::Registration { module, source }
    }
}

/// Result type for setup operations.
pub type SetupResult<T> = Result<T, SetupError>;
