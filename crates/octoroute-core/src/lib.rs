//! # Octoroute Core
//!
//! The event model of the Octoroute webhook dispatcher.
//!
//! This crate converts a raw GitHub webhook delivery (the `X-GitHub-Event`
//! header value plus the JSON body) into a [`WebhookEvent`], and supplies the
//! [`EventType`] and [`ActionType`] tags the dispatcher uses as routing keys.
//!
//! ```text
//! ("label", {...})  ──parse──▶  WebhookEvent {
//!                                   event_type: Some(Label),
//!                                   action:     Some("created"),
//!                                   repository: Some(o/r),
//!                                   payload:    EventPayload::Label(..),
//!                               }
//! ```
//!
//! Parsing never fails; see [`parse`] for the fallback rules.

pub mod error;
pub mod event;
pub mod model;

pub use error::{EventError, EventResult};
pub use event::{ActionType, EventPayload, EventType, WebhookEvent, parse};

/// Prelude for common imports.
pub mod prelude {
    pub use super::event::*;
    pub use super::model::*;
    pub use super::{EventError, EventResult};
}
