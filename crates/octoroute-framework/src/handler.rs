//! Handler system for Octoroute.
//!
//! A handler is any `Fn(&WebhookEvent) -> R` where `R` implements
//! [`HandlerResponse`]. Handlers are type-erased into a [`BoxedHandler`] at
//! registration time and wrapped, together with their filters, in a
//! [`HookEntry`].
//!
//! ```rust,ignore
//! // No return value
//! fn log_label(event: &WebhookEvent) {
//!     println!("label event from {:?}", event.repository_name());
//! }
//!
//! // Errors are logged by the dispatcher and do not affect other handlers
//! fn sync_labels(event: &WebhookEvent) -> anyhow::Result<()> {
//!     let label: LabelEvent = event.deserialize()?;
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use octoroute_core::{ActionType, EventType, WebhookEvent};

// ============================================================================
// HandlerResponse - Handler return values
// ============================================================================

/// Types a handler may return.
///
/// The dispatcher only distinguishes success from failure; a failure carries
/// a message that is logged and surfaced in the dispatch report.
pub trait HandlerResponse {
    /// Converts this value into the dispatcher's success/failure form.
    fn into_result(self) -> Result<(), String>;
}

impl HandlerResponse for () {
    fn into_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<T: HandlerResponse, E: fmt::Display> HandlerResponse for Result<T, E> {
    fn into_result(self) -> Result<(), String> {
        match self {
            Ok(t) => t.into_result(),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl<T: HandlerResponse> HandlerResponse for Option<T> {
    fn into_result(self) -> Result<(), String> {
        self.map_or(Ok(()), HandlerResponse::into_result)
    }
}

// ============================================================================
// BoxedHandler
// ============================================================================

/// A type-erased handler that can be stored in the registry.
pub type BoxedHandler = Arc<dyn Fn(&WebhookEvent) -> Result<(), String> + Send + Sync>;

/// Converts a handler function into a boxed handler.
pub fn into_handler<F, R>(f: F) -> BoxedHandler
where
    F: Fn(&WebhookEvent) -> R + Send + Sync + 'static,
    R: HandlerResponse,
{
    Arc::new(move |event: &WebhookEvent| f(event).into_result())
}

// ============================================================================
// HandlerId
// ============================================================================

/// Registry-unique identifier of one registration.
///
/// Ids are handed out in increasing order, so sorting by id yields
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl HandlerId {
    /// Returns the raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// HookEntry
// ============================================================================

/// One registration: a handler together with the filters it was declared with.
///
/// Entries are immutable once registered and shared through `Arc` by every
/// registry cell they were inserted into.
pub struct HookEntry {
    pub(crate) id: HandlerId,
    pub(crate) name: String,
    pub(crate) event: EventType,
    pub(crate) actions: Vec<ActionType>,
    pub(crate) repositories: Vec<String>,
    pub(crate) debug: bool,
    pub(crate) handler: BoxedHandler,
}

impl HookEntry {
    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn event(&self) -> EventType {
        self.event
    }

    /// The declared actions; empty means any action.
    pub fn actions(&self) -> &[ActionType] {
        &self.actions
    }

    /// The declared repositories; empty means any repository.
    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Invokes the handler. Panics are not caught here.
    pub fn call(&self, event: &WebhookEvent) -> Result<(), String> {
        (self.handler)(event)
    }
}

impl fmt::Debug for HookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("event", &self.event)
            .field("actions", &self.actions)
            .field("repositories", &self.repositories)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event() -> WebhookEvent {
        octoroute_core::parse("ping", &json!({ "zen": "Keep it simple." }))
    }

    #[test]
    fn test_unit_response_is_success() {
        assert_eq!(().into_result(), Ok(()));
    }

    #[test]
    fn test_result_response_keeps_error_message() {
        let ok: Result<(), String> = Ok(());
        assert_eq!(ok.into_result(), Ok(()));

        let err: Result<(), anyhow::Error> = Err(anyhow::anyhow!("boom"));
        assert_eq!(err.into_result(), Err("boom".to_string()));
    }

    #[test]
    fn test_option_response() {
        assert_eq!(None::<()>.into_result(), Ok(()));
        assert_eq!(Some(Err::<(), _>("bad")).into_result(), Err("bad".to_string()));
    }

    #[test]
    fn test_into_handler_erases_return_type() {
        let unit = into_handler(|_: &WebhookEvent| {});
        let failing = into_handler(|_: &WebhookEvent| -> Result<(), &'static str> { Err("nope") });

        let event = event();
        assert_eq!(unit(&event), Ok(()));
        assert_eq!(failing(&event), Err("nope".to_string()));
    }

    #[test]
    fn test_handler_id_display_and_order() {
        assert_eq!(HandlerId(3).to_string(), "#3");
        assert!(HandlerId(1) < HandlerId(2));
        assert_eq!(HandlerId(9).get(), 9);
    }
}
