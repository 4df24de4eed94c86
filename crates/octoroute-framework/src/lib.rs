//! # Octoroute Framework
//!
//! The handler registry and dispatch engine.
//!
//! Hooks are registered against an event type, optionally narrowed to a set
//! of actions and a set of `owner/name` repositories. Dispatching a delivery
//! selects the matching hooks, parses the payload once and invokes each hook
//! with failures isolated from one another.
//!
//! ```text
//!                     ┌───────────────────────────────────────┐
//!  (event, payload) ─▶│ HookRegistry                          │
//!                     │   tree[event][action][repo] ─▶ hooks  │
//!                     │   debug hooks present? only those     │
//!                     └───────────────┬───────────────────────┘
//!                                     │ parse once
//!                                     ▼
//!                        hook #1   hook #2   hook #3 ...
//!                        (errors and panics caught per hook)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use octoroute_framework::prelude::*;
//!
//! let registry = HookRegistry::new();
//! registry.register(
//!     Hook::on(EventType::Label).action(ActionType::Created).repository("doodla/octohook"),
//!     |event: &WebhookEvent| println!("new label in {:?}", event.repository_name()),
//! )?;
//!
//! let report = registry.dispatch("label", &payload);
//! assert!(report.all_succeeded());
//! ```

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod global;
pub mod handler;
pub mod hook;
pub mod registry;
pub mod tree;

pub use descriptor::{HookDescriptor, HookFn, HookModule};
pub use dispatch::DispatchReport;
pub use error::{FailureKind, HandlerFailure, RegistrationError, RegistrationResult};
pub use filter::{ActionKey, RepoKey};
pub use handler::{BoxedHandler, HandlerId, HandlerResponse, HookEntry, into_handler};
pub use hook::Hook;
pub use registry::{HookRegistry, RegistryStats};

pub use octoroute_core::{ActionType, EventType, WebhookEvent};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::hook_module;
    pub use crate::{
        ActionType, DispatchReport, EventType, HandlerId, Hook, HookDescriptor, HookModule,
        HookRegistry, RegistrationError, WebhookEvent,
    };
}
