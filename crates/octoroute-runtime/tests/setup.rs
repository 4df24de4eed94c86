//! Module loading driven by configuration files.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use octoroute_framework::{
    ActionType, EventType, HookDescriptor, HookRegistry, RegistrationError, WebhookEvent,
    hook_module,
};
use octoroute_runtime::{Octoroute, SetupError};
use serde_json::json;
use tempfile::TempDir;

static LABEL_CALLS: AtomicUsize = AtomicUsize::new(0);

fn count_label(_: &WebhookEvent) -> Result<(), String> {
    LABEL_CALLS.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

fn noop(_: &WebhookEvent) -> Result<(), String> {
    Ok(())
}

static LABEL_HOOK: HookDescriptor = HookDescriptor {
    name: "setup::count_label",
    event: EventType::Label,
    actions: &[ActionType::Created],
    repositories: &[],
    debug: false,
    handler: count_label,
};

static ISSUE_HOOK: HookDescriptor = HookDescriptor {
    name: "setup::issues",
    event: EventType::Issues,
    actions: &[],
    repositories: &[],
    debug: false,
    handler: noop,
};

static BAD_REPO_HOOK: HookDescriptor = HookDescriptor {
    name: "setup::bad_repo",
    event: EventType::Push,
    actions: &[],
    repositories: &["no-slash"],
    debug: false,
    handler: noop,
};

hook_module!(static LABELS = "labels" { LABEL_HOOK });
hook_module!(static ISSUES = "issues" { ISSUE_HOOK });
hook_module!(static BROKEN = "broken" { ISSUE_HOOK, BAD_REPO_HOOK });

fn build_from(dir: &TempDir, toml: &str) -> (Octoroute, Arc<HookRegistry>) {
    let path = dir.path().join("octoroute.toml");
    fs::write(&path, toml).unwrap();

    let registry = Arc::new(HookRegistry::new());
    let octoroute = Octoroute::builder()
        .config_file(&path)
        .without_env()
        .without_logging()
        .registry(registry.clone())
        .build()
        .unwrap();
    (octoroute, registry)
}

#[test]
fn test_disabled_module_is_not_loaded() {
    let dir = TempDir::new().unwrap();
    let (octoroute, registry) = build_from(&dir, "[hooks]\ndisabled = [\"issues\"]\n");

    let summary = octoroute.setup(&[LABELS, ISSUES]).unwrap();
    assert_eq!(summary.loaded, vec!["labels"]);
    assert_eq!(summary.skipped, vec!["issues"]);
    assert_eq!(registry.len(), 1);
    assert!(octoroute.dispatch("issues", &json!({"action": "opened"})).is_noop());
}

#[test]
fn test_enabled_list_selects_modules() {
    let dir = TempDir::new().unwrap();
    let (octoroute, _) = build_from(&dir, "[hooks]\nenabled = [\"labels\"]\n");

    octoroute.setup(&[ISSUES, LABELS]).unwrap();
    assert_eq!(octoroute.loaded_modules(), vec!["labels"]);

    let before = LABEL_CALLS.load(Ordering::SeqCst);
    let report = octoroute.dispatch("label", &json!({"action": "created"}));
    assert_eq!(report.succeeded, 1);
    assert!(LABEL_CALLS.load(Ordering::SeqCst) > before);
}

#[test]
fn test_repeated_setup_does_not_duplicate_hooks() {
    let dir = TempDir::new().unwrap();
    let (octoroute, registry) = build_from(&dir, "");

    octoroute.setup(&[LABELS, ISSUES]).unwrap();
    octoroute.setup(&[LABELS, ISSUES]).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(octoroute.dispatch("label", &json!({"action": "created"})).invoked(), 1);
}

#[test]
fn test_strict_mode_rejects_unknown_names() {
    let dir = TempDir::new().unwrap();
    let (octoroute, registry) =
        build_from(&dir, "[hooks]\nstrict = true\ndisabled = [\"typo\"]\n");

    let err = octoroute.setup(&[LABELS]).unwrap_err();
    assert!(matches!(err, SetupError::UnknownModule { ref name, .. } if name == "typo"));
    assert!(registry.is_empty());
}

#[test]
fn test_registration_error_aborts_setup() {
    let dir = TempDir::new().unwrap();
    let (octoroute, registry) = build_from(&dir, "");

    let err = octoroute.setup(&[LABELS, BROKEN]).unwrap_err();
    match err {
        SetupError::Registration { module, source } => {
            assert_eq!(module, "broken");
            assert!(matches!(source, RegistrationError::InvalidRepository { .. }));
        }
        other => panic!("expected registration error, got {other}"),
    }
    assert!(registry.is_empty());
    assert!(!octoroute.is_configured());
}

#[test]
fn test_contradictory_hooks_config_fails_build() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("octoroute.toml");
    fs::write(&path, "[hooks]\nenabled = [\"labels\"]\ndisabled = [\"labels\"]\n").unwrap();

    let result = Octoroute::builder()
        .config_file(&path)
        .without_env()
        .without_logging()
        .registry(Arc::new(HookRegistry::new()))
        .build();
    assert!(matches!(result, Err(SetupError::Config(_))));
}
