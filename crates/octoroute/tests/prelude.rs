use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use octoroute::prelude::*;
use octoroute::runtime::HooksConfig;
use serde_json::json;

static RELEASES: AtomicUsize = AtomicUsize::new(0);

#[hook(release, actions(published), crate = "::octoroute::framework")]
fn count_release(event: &WebhookEvent) {
    if event.action_type() == Some(ActionType::Published) {
        RELEASES.fetch_add(1, Ordering::SeqCst);
    }
}

hook_module!(static RELEASE_HOOKS = "releases" { COUNT_RELEASE_HOOK });

#[test]
fn test_facade_setup_and_dispatch() {
    let octoroute = Octoroute::with_registry(Arc::new(HookRegistry::new()), HooksConfig::default());
    octoroute.setup(&[RELEASE_HOOKS]).unwrap();

    let report = octoroute.dispatch("release", &json!({ "action": "published" }));
    assert_eq!(report.succeeded, 1);
    assert_eq!(RELEASES.load(Ordering::SeqCst), 1);

    let report = octoroute.dispatch("release", &json!({ "action": "created" }));
    assert!(report.is_noop());
}
