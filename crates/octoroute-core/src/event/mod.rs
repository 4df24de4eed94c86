//! Webhook event system.
//!
//! This module turns a raw delivery (event name + JSON body) into a
//! [`WebhookEvent`]:
//!
//! - [`EventType`] / [`ActionType`] - the closed tag sets used as dispatch keys
//! - [`WebhookEvent`] - the envelope fields every delivery shares, plus a
//!   typed [`EventPayload`] and the raw JSON
//! - [`parse`] - the conversion itself, which never fails
//!
//! # Parsing
//!
//! Envelope fields (`sender`, `repository`, ...) are extracted one by one so
//! that a malformed `organization` does not cost the handler its `repository`.
//! The event-specific body is then deserialized into the matching
//! [`EventPayload`] variant directly from the borrowed JSON value. Any failure
//! along the way is logged and degrades to a less specific event instead of
//! propagating.
//!
//! ```rust,ignore
//! use octoroute_core::{parse, EventPayload};
//!
//! let event = parse("label", &payload);
//! if let EventPayload::Label(label) = &event.payload {
//!     println!("label {} was {}", label.label.name, event.action.as_deref().unwrap_or("?"));
//! }
//! ```

pub mod kind;
pub mod payload;

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use crate::model::{Installation, Organization, Repository, User};

pub use kind::{ActionType, EventType};
pub use payload::*;

/// A parsed webhook delivery.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// The event name exactly as delivered.
    pub event_name: String,
    /// The resolved event tag, `None` when the name is not a known event.
    pub event_type: Option<EventType>,
    /// The raw `action` field, if the payload carries one.
    pub action: Option<String>,
    pub sender: Option<User>,
    pub repository: Option<Repository>,
    pub organization: Option<Organization>,
    pub installation: Option<Installation>,
    /// The event-specific body.
    pub payload: EventPayload,
    raw: Arc<Value>,
}

impl WebhookEvent {
    /// Creates a base event carrying only the envelope fields.
    pub fn base(event_name: &str, payload: &Value) -> Self {
        Self {
            event_name: event_name.to_string(),
            event_type: event_name.parse().ok(),
            action: payload
                .get("action")
                .and_then(Value::as_str)
                .map(str::to_string),
            sender: envelope_field(payload, "sender"),
            repository: envelope_field(payload, "repository"),
            organization: envelope_field(payload, "organization"),
            installation: envelope_field(payload, "installation"),
            payload: EventPayload::Unmodeled,
            raw: Arc::new(payload.clone()),
        }
    }

    /// Returns the parsed action tag.
    ///
    /// `None` when the payload has no action or the action is not a known tag.
    pub fn action_type(&self) -> Option<ActionType> {
        self.action.as_deref().and_then(|a| a.parse().ok())
    }

    /// Returns the originating repository as `owner/name`.
    pub fn repository_name(&self) -> Option<&str> {
        self.repository.as_ref().map(|r| r.full_name.as_str())
    }

    /// Returns the raw JSON body of the delivery.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Deserializes the raw body into a caller-defined shape.
    ///
    /// This is the escape hatch for events and fields the built-in model does
    /// not cover.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&*self.raw)
    }
}

/// Extracts one optional envelope field, logging and dropping it if malformed.
fn envelope_field<T: DeserializeOwned>(payload: &Value, key: &str) -> Option<T> {
    let value = payload.get(key)?;
    if value.is_null() {
        return None;
    }
    match T::deserialize(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(field = key, error = %e, "Malformed envelope field, ignoring");
            None
        }
    }
}

/// Parses a webhook delivery into a [`WebhookEvent`].
///
/// Never fails. Unknown event names and bodies that do not match the expected
/// shape yield a base event whose payload is [`EventPayload::Unmodeled`].
pub fn parse(event_name: &str, payload: &Value) -> WebhookEvent {
    let mut event = WebhookEvent::base(event_name, payload);

    let Some(event_type) = event.event_type else {
        warn!(event = event_name, "Unknown webhook event, returning base event");
        return event;
    };

    match parse_payload(event_type, payload) {
        Ok(typed) => event.payload = typed,
        Err(e) => {
            warn!(
                event = event_name,
                error = %e,
                "Failed to parse webhook payload, falling back to base event"
            );
        }
    }

    trace!(event = event_name, unmodeled = event.payload.is_unmodeled(), "Parsed webhook");
    event
}

fn parse_payload(event_type: EventType, payload: &Value) -> Result<EventPayload, serde_json::Error> {
    macro_rules! typed {
        ($variant:ident) => {
            Deserialize::deserialize(payload).map(EventPayload::$variant)
        };
    }

    match event_type {
        EventType::Create => typed!(Create),
        EventType::Delete => typed!(Delete),
        EventType::IssueComment => typed!(IssueComment),
        EventType::Issues => typed!(Issues),
        EventType::Label => typed!(Label),
        EventType::Ping => typed!(Ping),
        EventType::PullRequest => typed!(PullRequest),
        EventType::PullRequestReview => typed!(PullRequestReview),
        EventType::Push => typed!(Push),
        EventType::Release => typed!(Release),
        EventType::Star => typed!(Star),
        EventType::Status => typed!(Status),
        _ => Ok(EventPayload::Unmodeled),
    }
}
