//! The hook registry.
//!
//! [`HookRegistry`] owns the [`RegistryTree`] behind a `parking_lot::RwLock`.
//! Registration takes the write lock; dispatch takes the read lock only long
//! enough to snapshot the matching entries, so handlers run unlocked and may
//! themselves register further hooks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use octoroute_core::{EventType, WebhookEvent};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::descriptor::{HookDescriptor, HookModule};
use crate::error::RegistrationResult;
use crate::handler::{BoxedHandler, HandlerId, HandlerResponse, HookEntry, into_handler};
use crate::hook::{Hook, ResolvedHook};
use crate::tree::RegistryTree;

/// Handler registry and dispatcher.
///
/// `HookRegistry` is `Send + Sync`; share it behind an `Arc` or use the
/// process-wide instance in [`crate::global`].
#[derive(Default)]
pub struct HookRegistry {
    pub(crate) tree: RwLock<RegistryTree>,
    next_id: AtomicU64,
    pub(crate) deliveries: AtomicU64,
}

/// Counters describing the registry contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub registrations: usize,
    pub event_types: usize,
    pub cells: usize,
    pub debug_event_types: usize,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` with the given options.
    ///
    /// The handler name defaults to the handler's type name. Registering the
    /// same function twice yields two independent registrations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`](crate::RegistrationError) if a repository
    /// filter is not `owner/name` or the name is empty. Nothing is inserted in
    /// that case.
    pub fn register<F, R>(&self, hook: Hook, handler: F) -> RegistrationResult<HandlerId>
    where
        F: Fn(&WebhookEvent) -> R + Send + Sync + 'static,
        R: HandlerResponse,
    {
        let default_name = std::any::type_name::<F>();
        self.insert(hook, default_name, into_handler(handler))
    }

    /// Registers `handler` for every action of `event` in every repository.
    pub fn register_fn<F, R>(&self, event: EventType, handler: F) -> HandlerId
    where
        F: Fn(&WebhookEvent) -> R + Send + Sync + 'static,
        R: HandlerResponse,
    {
        let default_name = std::any::type_name::<F>();
        self.insert_resolved(ResolvedHook::wildcard(event), default_name, into_handler(handler))
    }

    /// Registers an already type-erased handler.
    pub fn register_boxed(&self, hook: Hook, handler: BoxedHandler) -> RegistrationResult<HandlerId> {
        self.insert(hook, "<boxed>", handler)
    }

    /// Registers a static descriptor, usually produced by `#[hook]`.
    pub fn register_descriptor(&self, descriptor: &HookDescriptor) -> RegistrationResult<HandlerId> {
        let handler = descriptor.handler;
        self.insert(descriptor.hook(), descriptor.name, Arc::new(handler))
    }

    /// Registers every descriptor of a module, in declaration order.
    ///
    /// All descriptors are validated first; if any is invalid nothing from the
    /// module is registered.
    pub fn register_module(&self, module: &HookModule) -> RegistrationResult<Vec<HandlerId>> {
        let resolved = module
            .hooks
            .iter()
            .map(|descriptor| Ok((descriptor.hook().resolve()?, descriptor)))
            .collect::<RegistrationResult<Vec<_>>>()?;

        let mut tree = self.tree.write();
        let ids: Vec<HandlerId> = resolved
            .into_iter()
            .map(|(hook, descriptor)| {
                self.insert_locked(&mut tree, hook, descriptor.name, Arc::new(descriptor.handler))
            })
            .collect();
        drop(tree);

        debug!(module = module.name, hooks = ids.len(), "Registered hook module");
        Ok(ids)
    }

    /// Removes every registration.
    ///
    /// Idempotent. Handler ids restart from the beginning, so re-registering
    /// the same hooks after a reset reproduces the same state.
    pub fn reset(&self) {
        let mut tree = self.tree.write();
        let removed = tree.len();
        tree.clear();
        self.next_id.store(0, Ordering::SeqCst);
        if removed > 0 {
            info!(removed, "Hook registry reset");
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Returns `true` if debug hooks currently suppress other hooks for `event`.
    pub fn is_debug_mode(&self, event: EventType) -> bool {
        self.tree.read().is_debug(event)
    }

    pub fn stats(&self) -> RegistryStats {
        let tree = self.tree.read();
        RegistryStats {
            registrations: tree.len(),
            event_types: tree.event_types().count(),
            cells: tree.cell_count(),
            debug_event_types: tree.event_types().filter(|e| tree.is_debug(*e)).count(),
        }
    }

    fn insert(&self, hook: Hook, default_name: &str, handler: BoxedHandler) -> RegistrationResult<HandlerId> {
        // Validate before allocating so rejected hooks do not consume an id.
        let resolved = hook.resolve()?;
        Ok(self.insert_resolved(resolved, default_name, handler))
    }

    fn insert_resolved(&self, resolved: ResolvedHook, default_name: &str, handler: BoxedHandler) -> HandlerId {
        let mut tree = self.tree.write();
        self.insert_locked(&mut tree, resolved, default_name, handler)
    }

    /// Allocates the id and inserts while the caller holds the write lock, so a
    /// concurrent `reset` cannot hand the same id out twice.
    fn insert_locked(
        &self,
        tree: &mut RegistryTree,
        resolved: ResolvedHook,
        default_name: &str,
        handler: BoxedHandler,
    ) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let entry = Arc::new(HookEntry {
            id,
            name: resolved.name.unwrap_or_else(|| default_name.to_string()),
            event: resolved.event,
            actions: resolved.actions,
            repositories: resolved.repositories,
            debug: resolved.debug,
            handler,
        });

        debug!(
            id = %entry.id,
            name = %entry.name,
            event = %entry.event,
            actions = ?entry.actions,
            repositories = ?entry.repositories,
            debug = entry.debug,
            cells = resolved.cells.len(),
            "Registered hook"
        );
        if entry.debug {
            info!(
                name = %entry.name,
                event = %entry.event,
                "Debug hook registered, other hooks for this event are suppressed"
            );
        }

        tree.insert(entry, &resolved.cells);
        id
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("stats", &self.stats())
            .finish()
    }
}
