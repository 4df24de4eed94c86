//! # Octoroute
//!
//! Register handlers for GitHub webhook events, filtered by event type, action
//! and repository, and dispatch incoming deliveries to every matching handler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌──────────────────────────────────────┐
//! │ host (HTTP,  │──▶│ Octoroute │──▶│ HookRegistry                         │
//! │ queue, CLI)  │   │  setup()  │   │  event ─▶ action ─▶ repo ─▶ handlers │──▶ handler(event)
//! └──────────────┘   └───────────┘   └──────────────────────────────────────┘
//! ```
//!
//! - **Core**: the event model (`EventType`, `ActionType`, `WebhookEvent`)
//! - **Framework**: hook registration, the registry tree, dispatch
//! - **Runtime**: configuration, logging, module setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use octoroute::prelude::*;
//!
//! #[hook(label, actions(created), crate = "::octoroute::framework")]
//! fn on_label(event: &WebhookEvent) {
//!     tracing::info!(repo = ?event.repository_name(), "label created");
//! }
//!
//! hook_module!(static LABELS = "labels" { ON_LABEL_HOOK });
//!
//! fn main() -> anyhow::Result<()> {
//!     let octoroute = Octoroute::new();
//!     octoroute.setup(&[LABELS])?;
//!     octoroute.dispatch("label", &payload);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `macros`: Enable the `#[hook]` attribute (default)
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use octoroute_core as core;
pub use octoroute_framework as framework;
pub use octoroute_runtime as runtime;

#[cfg(feature = "macros")]
pub use octoroute_macros::hook;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use octoroute::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use octoroute_runtime::{Octoroute, SetupError};

    // Registration
    pub use octoroute_framework::{
        DispatchReport, HandlerId, Hook, HookDescriptor, HookModule, HookRegistry,
        RegistrationError, hook_module,
    };

    // Event model
    pub use octoroute_core::{ActionType, EventPayload, EventType, WebhookEvent};

    #[cfg(feature = "macros")]
    pub use octoroute_macros::hook;
}
