//! Hook descriptors: static, `Copy` handles to a hook and its filters.

use std::fmt;

use octoroute_core::{ActionType, EventType, WebhookEvent};

use crate::hook::Hook;

// ─── HookDescriptor ───────────────────────────────────────────────────────────

/// Signature of a descriptor's handler.
pub type HookFn = fn(&WebhookEvent) -> Result<(), String>;

/// A static description of one hook.
///
/// Produced by the `#[hook(...)]` attribute, which keeps the annotated function
/// as-is and emits a `<FN_NAME>_HOOK` static next to it. Descriptors do nothing
/// until they are registered, either one by one with
/// [`HookRegistry::register_descriptor`](crate::HookRegistry::register_descriptor)
/// or grouped into a [`HookModule`].
#[derive(Clone, Copy)]
pub struct HookDescriptor {
    /// Name used in logs and reports.
    pub name: &'static str,
    pub event: EventType,
    /// Empty means any action.
    pub actions: &'static [ActionType],
    /// `owner/name` repositories; empty means any repository.
    pub repositories: &'static [&'static str],
    pub debug: bool,
    pub handler: HookFn,
}

impl HookDescriptor {
    /// Returns the registration options this descriptor stands for.
    pub fn hook(&self) -> Hook {
        Hook::on(self.event)
            .actions(self.actions.iter().copied())
            .repositories(self.repositories.iter().copied())
            .debug(self.debug)
            .name(self.name)
    }
}

impl fmt::Debug for HookDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDescriptor")
            .field("name", &self.name)
            .field("event", &self.event)
            .field("actions", &self.actions)
            .field("repositories", &self.repositories)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

// ─── HookModule ───────────────────────────────────────────────────────────────

/// A named group of hooks, loaded together by the runtime.
///
/// The name is what `hooks.enabled` / `hooks.disabled` in the configuration
/// refer to.
#[derive(Debug, Clone, Copy)]
pub struct HookModule {
    pub name: &'static str,
    pub hooks: &'static [&'static HookDescriptor],
}

impl HookModule {
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Declares a [`HookModule`].
///
/// ```rust,ignore
/// hook_module! {
///     /// Label bookkeeping.
///     pub static LABELS = "labels" {
///         LOG_LABEL_HOOK,
///         SYNC_LABELS_HOOK,
///     }
/// }
///
/// // or as an expression, in a `static` or `const` initializer
/// static LABELS: HookModule = hook_module!("labels" => [LOG_LABEL_HOOK]);
/// ```
#[macro_export]
macro_rules! hook_module {
    (
        $(#[$meta:meta])*
        $vis:vis static $ident:ident = $name:literal { $($hook:path),* $(,)? }
    ) => {
        $(#[$meta])*
        $vis static $ident: $crate::HookModule = $crate::HookModule {
            name: $name,
            hooks: &[$(&$hook),*],
        };
    };

    ($name:expr => [$($hook:path),* $(,)?]) => {
        $crate::HookModule {
            name: $name,
            hooks: &[$(&$hook),*],
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HookRegistry;
    use serde_json::json;

    fn created(_: &WebhookEvent) -> Result<(), String> {
        Ok(())
    }

    fn failing(_: &WebhookEvent) -> Result<(), String> {
        Err("always fails".to_string())
    }

    static CREATED_HOOK: HookDescriptor = HookDescriptor {
        name: "created",
        event: EventType::Label,
        actions: &[ActionType::Created],
        repositories: &["doodla/octohook"],
        debug: false,
        handler: created,
    };

    static FAILING_HOOK: HookDescriptor = HookDescriptor {
        name: "failing",
        event: EventType::Label,
        actions: &[],
        repositories: &[],
        debug: false,
        handler: failing,
    };

    hook_module! {
        static LABELS = "labels" {
            CREATED_HOOK,
            FAILING_HOOK,
        }
    }

    #[test]
    fn test_descriptor_to_hook() {
        let hook = CREATED_HOOK.hook();
        assert_eq!(hook.event(), EventType::Label);
        assert_eq!(hook.get_name(), Some("created"));
        assert!(!hook.is_debug());
    }

    #[test]
    fn test_module_macro() {
        assert_eq!(LABELS.name, "labels");
        assert_eq!(LABELS.len(), 2);

        static INLINE: HookModule = hook_module!("inline" => [CREATED_HOOK]);
        assert_eq!(INLINE.hooks[0].name, "created");
    }

    #[test]
    fn test_register_module() {
        let registry = HookRegistry::new();
        let ids = registry.register_module(&LABELS).unwrap();
        assert_eq!(ids.len(), 2);

        let payload = json!({
            "action": "created",
            "label": { "name": "bug" },
            "repository": { "id": 1, "name": "octohook", "full_name": "doodla/octohook" }
        });
        let report = registry.dispatch("label", &payload);
        assert_eq!(report.candidates, ids);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed[0].name, "failing");
    }
}
