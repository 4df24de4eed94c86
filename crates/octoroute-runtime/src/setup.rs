//! Hook-module loading and the runtime entry point.
//!
//! [`Octoroute`] ties a [`HookRegistry`] to the `hooks` section of the
//! configuration. `setup` loads a set of [`HookModule`]s into the registry,
//! honouring the enabled/disabled lists; calling it again replaces everything
//! that was loaded before.
//!
//! ```text
//!   setup([a, b, c])
//!        │
//!        ├─ configured already? ── warn + reset
//!        ├─ strict? ── every configured name must be offered
//!        ├─ enabled/disabled ── skip filtered modules
//!        └─ register_module(..) for the rest, in order
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use octoroute_runtime::Octoroute;
//!
//! // Config from the current directory, logging initialized, global registry.
//! let octoroute = Octoroute::new();
//! octoroute.setup(&[LABELS, PULLS])?;
//!
//! let report = octoroute.dispatch("label", &payload);
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use octoroute_framework::global::default_registry;
use octoroute_framework::{DispatchReport, HookModule, HookRegistry};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ConfigLoader, HooksConfig, OctorouteConfig, validate_config};
use crate::error::{SetupError, SetupResult};
use crate::logging;

/// What a call to [`Octoroute::setup`] loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupSummary {
    /// Modules registered, in load order.
    pub loaded: Vec<&'static str>,
    /// Modules filtered out by the hooks config or offered twice.
    pub skipped: Vec<&'static str>,
    /// Total number of hooks registered.
    pub hooks: usize,
}

#[derive(Debug, Default)]
struct SetupState {
    configured: bool,
    loaded: Vec<&'static str>,
}

/// The Octoroute runtime: a registry plus the module selection rules.
pub struct Octoroute {
    registry: Arc<HookRegistry>,
    hooks: HooksConfig,
    state: Mutex<SetupState>,
}

impl Default for Octoroute {
    fn default() -> Self {
        Self::new()
    }
}

impl Octoroute {
    /// Creates a runtime with automatic configuration loading.
    ///
    /// Searches the default locations, initializes logging and binds the
    /// process-wide registry. Falls back to defaults if loading or validation
    /// fails.
    pub fn new() -> Self {
        let config = ConfigLoader::new().load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config ({e}), using defaults");
            OctorouteConfig::default()
        });

        Self::from_config(&config)
    }

    pub fn builder() -> OctorouteBuilder {
        OctorouteBuilder::new()
    }

    /// Creates a runtime from configuration, bound to the process-wide registry.
    ///
    /// Initializes logging; does nothing to logging if a subscriber is
    /// already installed. A configuration that fails validation is replaced
    /// by the defaults.
    pub fn from_config(config: &OctorouteConfig) -> Self {
        let fallback;
        let config = match validate_config(config) {
            Ok(()) => config,
            Err(e) => {
                eprintln!("Warning: Invalid config ({e}), using defaults");
                fallback = OctorouteConfig::default();
                &fallback
            }
        };

        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            "Runtime initialized from configuration"
        );

        Self::with_registry(default_registry().clone(), config.hooks.clone())
    }

    /// Creates a runtime over an explicit registry without touching logging.
    pub fn with_registry(registry: Arc<HookRegistry>, hooks: HooksConfig) -> Self {
        Self {
            registry,
            hooks,
            state: Mutex::new(SetupState::default()),
        }
    }

    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    pub fn hooks_config(&self) -> &HooksConfig {
        &self.hooks
    }

    /// Loads `modules` into the registry.
    ///
    /// A second call logs a warning and resets the registry first, so the
    /// registry ends up holding exactly the hooks of the latest call.
    ///
    /// # Errors
    ///
    /// [`SetupError::UnknownModule`] in strict mode when the hooks config
    /// names a module not in `modules`, and [`SetupError::Registration`] when
    /// a hook is rejected. On error the registry is left empty and the
    /// runtime unconfigured.
    pub fn setup(&self, modules: &[HookModule]) -> SetupResult<SetupSummary> {
        let mut state = self.state.lock();

        if state.configured {
            warn!("setup called multiple times, resetting before reloading");
            self.clear(&mut state);
        }

        if self.hooks.strict {
            self.check_known(modules)?;
        }

        let mut summary = SetupSummary::default();
        let mut seen = HashSet::new();

        for module in modules {
            if !seen.insert(module.name) {
                warn!(module = module.name, "Hook module offered twice, skipping duplicate");
                summary.skipped.push(module.name);
                continue;
            }
            if !self.hooks.is_enabled(module.name) {
                debug!(module = module.name, "Hook module disabled by configuration");
                summary.skipped.push(module.name);
                continue;
            }

            match self.registry.register_module(module) {
                Ok(ids) => {
                    summary.hooks += ids.len();
                    summary.loaded.push(module.name);
                }
                Err(e) => {
                    self.clear(&mut state);
                    return Err(SetupError::registration(module.name, e));
                }
            }
        }

        state.loaded = summary.loaded.clone();
        state.configured = true;

        info!(
            modules = summary.loaded.len(),
            skipped = summary.skipped.len(),
            hooks = summary.hooks,
            "Hook modules loaded"
        );
        Ok(summary)
    }

    /// Clears the registry and forgets every loaded module. Idempotent.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        self.clear(&mut state);
    }

    /// Returns `true` once `setup` has succeeded and until the next `reset`.
    pub fn is_configured(&self) -> bool {
        self.state.lock().configured
    }

    /// Names of the modules loaded by the last successful `setup`.
    pub fn loaded_modules(&self) -> Vec<&'static str> {
        self.state.lock().loaded.clone()
    }

    /// Dispatches a delivery to the registry.
    pub fn dispatch(&self, event_name: &str, payload: &Value) -> DispatchReport {
        self.registry.dispatch(event_name, payload)
    }

    /// Dispatches a delivery whose body has not been parsed yet.
    pub fn dispatch_str(&self, event_name: &str, body: &str) -> DispatchReport {
        self.registry.dispatch_str(event_name, body)
    }

    fn clear(&self, state: &mut SetupState) {
        self.registry.reset();
        state.loaded.clear();
        state.configured = false;
    }

    fn check_known(&self, modules: &[HookModule]) -> SetupResult<()> {
        let offered: HashSet<&str> = modules.iter().map(|m| m.name).collect();
        let unknown = self
            .hooks
            .enabled
            .iter()
            .chain(&self.hooks.disabled)
            .find(|name| !offered.contains(name.as_str()));

        match unknown {
            Some(name) => {
                let mut available: Vec<&str> = offered.into_iter().collect();
                available.sort_unstable();
                Err(SetupError::UnknownModule {
                    name: name.clone(),
                    available: available.join(", "),
                })
            }
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Octoroute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Octoroute")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .field("configured", &state.configured)
            .field("loaded", &state.loaded)
            .finish()
    }
}

// =============================================================================
// OctorouteBuilder
// =============================================================================

/// Builder for an [`Octoroute`] runtime with custom configuration sources.
///
/// ```rust,ignore
/// let octoroute = Octoroute::builder()
///     .config_file("deploy/octoroute.toml")
///     .profile("production")
///     .build()?;
/// ```
pub struct OctorouteBuilder {
    config_loader: ConfigLoader,
    registry: Option<Arc<HookRegistry>>,
    init_logging: bool,
}

impl Default for OctorouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OctorouteBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            registry: None,
            init_logging: true,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading `OCTOROUTE_*` environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: OctorouteConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Uses `registry` instead of the process-wide one.
    pub fn registry(mut self, registry: Arc<HookRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Leaves the global tracing subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Loads and validates the configuration, then builds the runtime.
    pub fn build(self) -> SetupResult<Octoroute> {
        let config = self.config_loader.load()?;
        validate_config(&config)?;

        if self.init_logging {
            logging::init_from_config(&config.logging);
        }

        let registry = self.registry.unwrap_or_else(|| default_registry().clone());
        debug!(hooks = ?config.hooks, "Runtime built");
        Ok(Octoroute::with_registry(registry, config.hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octoroute_framework::{EventType, HookDescriptor, hook_module};
    use serde_json::json;

    fn noop(_: &octoroute_framework::WebhookEvent) -> Result<(), String> {
        Ok(())
    }

    static PING_HOOK: HookDescriptor = HookDescriptor {
        name: "tests::ping",
        event: EventType::Ping,
        actions: &[],
        repositories: &[],
        debug: false,
        handler: noop,
    };

    static STAR_HOOK: HookDescriptor = HookDescriptor {
        name: "tests::star",
        event: EventType::Star,
        actions: &[],
        repositories: &[],
        debug: false,
        handler: noop,
    };

    hook_module!(static PINGS = "pings" { PING_HOOK });
    hook_module!(static STARS = "stars" { STAR_HOOK, PING_HOOK });

    fn runtime(hooks: HooksConfig) -> Octoroute {
        Octoroute::with_registry(Arc::new(HookRegistry::new()), hooks)
    }

    #[test]
    fn test_setup_loads_all_modules_by_default() {
        let octoroute = runtime(HooksConfig::default());
        let summary = octoroute.setup(&[PINGS, STARS]).unwrap();

        assert_eq!(summary.loaded, vec!["pings", "stars"]);
        assert!(summary.skipped.is_empty());
        assert_eq!(summary.hooks, 3);
        assert_eq!(octoroute.registry().len(), 3);
        assert!(octoroute.is_configured());
        assert_eq!(octoroute.loaded_modules(), vec!["pings", "stars"]);
    }

    #[test]
    fn test_setup_twice_replaces_hooks() {
        let octoroute = runtime(HooksConfig::default());
        octoroute.setup(&[PINGS, STARS]).unwrap();
        octoroute.setup(&[PINGS]).unwrap();

        assert_eq!(octoroute.registry().len(), 1);
        assert_eq!(octoroute.loaded_modules(), vec!["pings"]);
        assert_eq!(octoroute.dispatch("ping", &json!({})).invoked(), 1);
    }

    #[test]
    fn test_duplicate_module_is_skipped() {
        let octoroute = runtime(HooksConfig::default());
        let summary = octoroute.setup(&[PINGS, PINGS]).unwrap();

        assert_eq!(summary.loaded, vec!["pings"]);
        assert_eq!(summary.skipped, vec!["pings"]);
        assert_eq!(octoroute.registry().len(), 1);
    }

    #[test]
    fn test_reset_clears_state() {
        let octoroute = runtime(HooksConfig::default());
        octoroute.setup(&[STARS]).unwrap();
        octoroute.reset();
        octoroute.reset();

        assert!(!octoroute.is_configured());
        assert!(octoroute.loaded_modules().is_empty());
        assert!(octoroute.registry().is_empty());
        assert!(octoroute.dispatch("star", &json!({})).is_noop());
    }

    #[test]
    fn test_strict_rejects_unknown_module() {
        let octoroute = runtime(HooksConfig {
            enabled: vec!["pings".into(), "missing".into()],
            strict: true,
            ..Default::default()
        });

        match octoroute.setup(&[PINGS, STARS]) {
            Err(SetupError::UnknownModule { name, available }) => {
                assert_eq!(name, "missing");
                assert_eq!(available, "pings, stars");
            }
            other => panic!("expected unknown module error, got {other:?}"),
        }
        assert!(octoroute.registry().is_empty());
        assert!(!octoroute.is_configured());
    }

    #[test]
    fn test_from_config_replaces_invalid_config() {
        let mut config = OctorouteConfig::default();
        config.hooks.enabled = vec!["pings".into()];
        config.hooks.disabled = vec!["pings".into()];

        let octoroute = Octoroute::from_config(&config);
        assert!(octoroute.hooks_config().enabled.is_empty());
        assert!(octoroute.hooks_config().disabled.is_empty());

        config.hooks.disabled.clear();
        let octoroute = Octoroute::from_config(&config);
        assert_eq!(octoroute.hooks_config().enabled, vec!["pings".to_string()]);
    }

    #[test]
    fn test_builder_with_merged_config() {
        let registry = Arc::new(HookRegistry::new());
        let octoroute = Octoroute::builder()
            .search_path("/nonexistent/octoroute")
            .without_env()
            .without_logging()
            .registry(registry.clone())
            .merge(OctorouteConfig {
                hooks: HooksConfig {
                    disabled: vec!["stars".into()],
                    ..Default::default()
                },
                ..Default::default()
            })
            .build()
            .unwrap();

        let summary = octoroute.setup(&[PINGS, STARS]).unwrap();
        assert_eq!(summary.loaded, vec!["pings"]);
        assert_eq!(summary.skipped, vec!["stars"]);
        assert_eq!(registry.len(), 1);
    }
}
