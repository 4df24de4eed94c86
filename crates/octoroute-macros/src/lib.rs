//! Procedural macros for Octoroute.
//!
//! This crate provides:
//!
//! - `#[hook(...)]` - Turns a plain handler function into a registrable
//!   `HookDescriptor`
//!
//! ```rust,ignore
//! use octoroute_macros::hook;
//!
//! #[hook(label, actions(created, edited), repositories("doodla/octohook"))]
//! fn on_label(event: &WebhookEvent) -> anyhow::Result<()> {
//!     Ok(())
//! }
//!
//! registry.register_descriptor(&ON_LABEL_HOOK)?;
//! ```

mod hook;

use proc_macro::TokenStream;

/// Declares a webhook hook.
///
/// The annotated function is left unchanged. Next to it the macro emits a
/// `static <FN_NAME>_HOOK: HookDescriptor` with the same visibility, which can
/// be registered directly or listed in a `hook_module!`.
///
/// # Arguments
///
/// | Argument | Example | Description |
/// |----------|---------|-------------|
/// | event | `pull_request` | Required, first. The event type, as its wire name |
/// | `actions(..)` | `actions(opened, closed)` | Action filter; omitted means any action |
/// | `repositories(..)` | `repositories("o/r")` | `owner/name` filter; omitted means any repository |
/// | `debug` | `debug` | Marks the hook as a debug hook |
/// | `name = ".."` | `name = "ci"` | Log name; defaults to the function path |
/// | `crate = ".."` | `crate = "::octoroute::framework"` | Path to the framework crate |
///
/// The function must take a single `&WebhookEvent` and return a type that
/// implements `HandlerResponse`.
#[proc_macro_attribute]
pub fn hook(attr: TokenStream, item: TokenStream) -> TokenStream {
    hook::expand(attr.into(), item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
