//! Error types for hook registration and dispatch.

use std::fmt;

use octoroute_core::EventError;
use thiserror::Error;

use crate::handler::HandlerId;

/// Errors raised when a hook registration is malformed.
///
/// Registration fails fast: nothing is inserted into the registry when any of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An event or action string did not parse.
    #[error(transparent)]
    Event(#[from] EventError),

    /// A repository filter is not of the form `owner/name`.
    #[error("invalid repository filter '{repository}': {reason}")]
    InvalidRepository {
        repository: String,
        reason: &'static str,
    },

    /// An explicit handler name was empty.
    #[error("handler name must not be empty")]
    EmptyName,
}

impl RegistrationError {
    pub(crate) fn invalid_repository(repository: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRepository {
            repository: repository.into(),
            reason,
        }
    }
}

/// Result type for registration operations.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// How a handler invocation went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The handler returned an `Err`.
    Error,
    /// The handler panicked.
    Panic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Error => f.write_str("returned an error"),
            FailureKind::Panic => f.write_str("panicked"),
        }
    }
}

/// A single handler failure captured during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("handler '{name}' ({id}) {kind}: {message}")]
pub struct HandlerFailure {
    pub id: HandlerId,
    pub name: String,
    pub kind: FailureKind,
    pub message: String,
}
