//! Error types for the event model.

use thiserror::Error;

/// Errors raised when converting wire strings into event tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The event name does not correspond to any known webhook event.
    #[error("unknown webhook event: '{0}'")]
    UnknownEvent(String),

    /// The action string does not correspond to any known webhook action.
    #[error("unknown webhook action: '{0}'")]
    UnknownAction(String),
}

/// Result type for event model operations.
pub type EventResult<T> = Result<T, EventError>;
