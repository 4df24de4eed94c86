//! Event dispatch.
//!
//! When a delivery arrives, [`HookRegistry::dispatch`]:
//!
//! 1. Resolves the event name; unknown events are logged and dropped
//! 2. Reads the action and `repository.full_name` from the payload
//! 3. Selects the matching hooks (debug hooks only, if any are registered
//!    for the event type)
//! 4. Parses the payload once, if anything matched
//! 5. Invokes every hook in registration order, isolating failures
//!
//! Dispatch never returns an error and never propagates a handler panic; the
//! outcome is summarized in a [`DispatchReport`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;

use octoroute_core::{ActionType, EventType, WebhookEvent, parse};
use serde_json::Value;
use tracing::{Level, debug, error, span, trace, warn};

use crate::error::{FailureKind, HandlerFailure};
use crate::handler::{HandlerId, HookEntry};
use crate::registry::HookRegistry;

/// Summary of one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// The resolved event type; `None` if the event name was unknown.
    pub event: Option<EventType>,
    /// Whether debug hooks suppressed all other hooks.
    pub debug_mode: bool,
    /// The hooks selected for this delivery, in invocation order.
    pub candidates: Vec<HandlerId>,
    /// Number of hooks that completed successfully.
    pub succeeded: usize,
    /// Hooks that returned an error or panicked.
    pub failed: Vec<HandlerFailure>,
}

impl DispatchReport {
    fn ignored() -> Self {
        Self::default()
    }

    /// Returns `true` if no hook was invoked.
    pub fn is_noop(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns `true` if every invoked hook succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of hooks invoked.
    pub fn invoked(&self) -> usize {
        self.candidates.len()
    }
}

impl HookRegistry {
    /// Dispatches one delivery to the matching hooks.
    ///
    /// # Arguments
    ///
    /// * `event_name` - The `X-GitHub-Event` header value.
    /// * `payload` - The decoded JSON body.
    pub fn dispatch(&self, event_name: &str, payload: &Value) -> DispatchReport {
        let delivery = self.deliveries.fetch_add(1, Ordering::Relaxed) + 1;
        let span = span!(Level::DEBUG, "dispatch", event = %event_name, delivery);
        let _enter = span.enter();

        let event_type = match event_name.parse::<EventType>() {
            Ok(event_type) => event_type,
            Err(e) => {
                warn!(error = %e, "Ignoring delivery for unknown event type");
                return DispatchReport::ignored();
            }
        };

        let action = payload.get("action").and_then(Value::as_str).and_then(|raw| {
            raw.parse::<ActionType>()
                .inspect_err(|e| warn!(error = %e, "Unknown action, only wildcard hooks apply"))
                .ok()
        });
        let repository = payload
            .get("repository")
            .and_then(|repo| repo.get("full_name"))
            .and_then(Value::as_str);

        // Snapshot under the read lock; handlers run unlocked.
        let resolution = self.tree.read().resolve(event_type, action, repository);

        let mut report = DispatchReport {
            event: Some(event_type),
            debug_mode: resolution.debug_mode,
            candidates: resolution.handlers.iter().map(|entry| entry.id()).collect(),
            ..DispatchReport::default()
        };

        if resolution.debug_mode {
            debug!("Debug hooks registered, non-debug hooks suppressed");
        }
        if resolution.handlers.is_empty() {
            trace!(?action, repository, "No hooks matched");
            return report;
        }

        let event = parse(event_name, payload);
        debug!(hooks = resolution.handlers.len(), ?action, repository, "Dispatching");

        for entry in &resolution.handlers {
            match invoke(entry, &event) {
                Ok(()) => report.succeeded += 1,
                Err(failure) => {
                    error!(
                        handler = %failure.name,
                        id = %failure.id,
                        kind = %failure.kind,
                        error = %failure.message,
                        "Hook failed"
                    );
                    report.failed.push(failure);
                }
            }
        }

        report
    }

    /// Decodes `body` as JSON and dispatches it.
    ///
    /// An undecodable body is logged and yields an empty report.
    pub fn dispatch_str(&self, event_name: &str, body: &str) -> DispatchReport {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => self.dispatch(event_name, &payload),
            Err(e) => {
                warn!(event = event_name, error = %e, "Ignoring delivery with invalid JSON body");
                DispatchReport::ignored()
            }
        }
    }
}

/// Runs one hook, turning errors and panics into a [`HandlerFailure`].
fn invoke(entry: &HookEntry, event: &WebhookEvent) -> Result<(), HandlerFailure> {
    trace!(handler = entry.name(), id = %entry.id(), "Invoking hook");

    let (kind, message) = match panic::catch_unwind(AssertUnwindSafe(|| entry.call(event))) {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(message)) => (FailureKind::Error, message),
        Err(panic) => (FailureKind::Panic, panic_message(panic.as_ref())),
    };

    Err(HandlerFailure {
        id: entry.id(),
        name: entry.name().to_string(),
        kind,
        message,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::Hook;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn counter_hook(counter: &Arc<AtomicUsize>) -> impl Fn(&WebhookEvent) + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |_: &WebhookEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dispatch_no_hooks() {
        let registry = HookRegistry::new();
        let report = registry.dispatch("label", &json!({ "action": "created" }));

        assert_eq!(report.event, Some(EventType::Label));
        assert!(report.is_noop());
    }

    #[test]
    fn test_dispatch_unknown_event() {
        let registry = HookRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.register(Hook::on(EventType::Label), counter_hook(&counter)).unwrap();

        let report = registry.dispatch("not_a_real_event", &json!({}));
        assert_eq!(report, DispatchReport::default());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_unknown_action_runs_wildcard_only() {
        let registry = HookRegistry::new();
        let any = Arc::new(AtomicUsize::new(0));
        let specific = Arc::new(AtomicUsize::new(0));
        registry.register(Hook::on(EventType::Label), counter_hook(&any)).unwrap();
        registry
            .register(
                Hook::on(EventType::Label).action(ActionType::Created),
                counter_hook(&specific),
            )
            .unwrap();

        let report = registry.dispatch("label", &json!({ "action": "exploded" }));
        assert_eq!(report.invoked(), 1);
        assert_eq!(any.load(Ordering::SeqCst), 1);
        assert_eq!(specific.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_receives_parsed_event() {
        let registry = HookRegistry::new();
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        registry
            .register(Hook::on(EventType::Ping), move |event: &WebhookEvent| {
                *seen_clone.lock() = event.raw().get("zen").cloned();
            })
            .unwrap();

        registry.dispatch("ping", &json!({ "zen": "Design for failure." }));
        assert_eq!(*seen.lock(), Some(json!("Design for failure.")));
    }

    #[test]
    fn test_error_and_panic_are_reported() {
        let registry = HookRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let failing = registry
            .register(Hook::on(EventType::Push).name("failing"), |_: &WebhookEvent| {
                Err::<(), _>("disk full")
            })
            .unwrap();
        let panicking = registry
            .register(Hook::on(EventType::Push).name("panicking"), |_: &WebhookEvent| -> Result<(), String> {
                panic!("handler exploded")
            })
            .unwrap();
        registry.register(Hook::on(EventType::Push), counter_hook(&counter)).unwrap();

        let report = registry.dispatch("push", &json!({}));

        assert_eq!(report.invoked(), 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!report.all_succeeded());
        assert_eq!(
            report.failed,
            vec![
                HandlerFailure {
                    id: failing,
                    name: "failing".into(),
                    kind: FailureKind::Error,
                    message: "disk full".into(),
                },
                HandlerFailure {
                    id: panicking,
                    name: "panicking".into(),
                    kind: FailureKind::Panic,
                    message: "handler exploded".into(),
                },
            ]
        );
    }

    #[test]
    fn test_formatted_panic_message() {
        let registry = HookRegistry::new();
        registry
            .register(Hook::on(EventType::Push), |_: &WebhookEvent| -> Result<(), String> {
                let code = 7;
                panic!("exit code {code}")
            })
            .unwrap();

        let report = registry.dispatch("push", &json!({}));
        assert_eq!(report.failed[0].message, "exit code 7");
    }

    #[test]
    fn test_dispatch_str() {
        let registry = HookRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        registry.register(Hook::on(EventType::Star), counter_hook(&counter)).unwrap();

        let report = registry.dispatch_str("star", r#"{"action":"created","starred_at":null}"#);
        assert_eq!(report.succeeded, 1);

        let report = registry.dispatch_str("star", "{not json");
        assert!(report.is_noop());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_register_during_dispatch() {
        let registry = Arc::new(HookRegistry::new());
        let inner = Arc::clone(&registry);
        registry
            .register(Hook::on(EventType::Ping), move |_: &WebhookEvent| {
                inner.register_fn(EventType::Ping, |_: &WebhookEvent| {});
            })
            .unwrap();

        let report = registry.dispatch("ping", &json!({}));
        assert_eq!(report.succeeded, 1);
        assert_eq!(registry.len(), 2);
    }
}
