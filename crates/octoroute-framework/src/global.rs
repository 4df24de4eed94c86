//! The process-wide default registry.
//!
//! Convenience for hosts that only ever need one registry:
//!
//! ```rust,ignore
//! use octoroute_framework::global::{hook, handle_webhook};
//!
//! hook(Hook::on(EventType::Label).action(ActionType::Created), on_label)?;
//! handle_webhook("label", &payload);
//! ```
//!
//! Everything here delegates to [`default_registry`].

use std::sync::{Arc, LazyLock};

use octoroute_core::WebhookEvent;
use serde_json::Value;

use crate::descriptor::HookModule;
use crate::dispatch::DispatchReport;
use crate::error::RegistrationResult;
use crate::handler::{HandlerId, HandlerResponse};
use crate::hook::Hook;
use crate::registry::HookRegistry;

static DEFAULT_REGISTRY: LazyLock<Arc<HookRegistry>> = LazyLock::new(|| Arc::new(HookRegistry::new()));

/// Returns the process-wide registry.
pub fn default_registry() -> &'static Arc<HookRegistry> {
    &DEFAULT_REGISTRY
}

/// Registers a hook on the default registry.
pub fn hook<F, R>(options: Hook, handler: F) -> RegistrationResult<HandlerId>
where
    F: Fn(&WebhookEvent) -> R + Send + Sync + 'static,
    R: HandlerResponse,
{
    DEFAULT_REGISTRY.register(options, handler)
}

/// Registers every hook of `module` on the default registry.
pub fn load_module(module: &HookModule) -> RegistrationResult<Vec<HandlerId>> {
    DEFAULT_REGISTRY.register_module(module)
}

/// Dispatches a delivery through the default registry.
pub fn handle_webhook(event_name: &str, payload: &Value) -> DispatchReport {
    DEFAULT_REGISTRY.dispatch(event_name, payload)
}

/// Clears the default registry.
pub fn reset() {
    DEFAULT_REGISTRY.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use octoroute_core::{ActionType, EventType};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // The default registry is shared by every test in this binary, so its
    // whole lifecycle is exercised in one test.
    #[test]
    fn test_default_registry_lifecycle() {
        reset();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        hook(
            Hook::on(EventType::Issues).action(ActionType::Opened),
            move |_: &WebhookEvent| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();
        assert_eq!(default_registry().len(), 1);

        let report = handle_webhook("issues", &json!({ "action": "opened" }));
        assert_eq!(report.succeeded, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        reset();
        assert!(default_registry().is_empty());
        assert!(handle_webhook("issues", &json!({ "action": "opened" })).is_noop());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
