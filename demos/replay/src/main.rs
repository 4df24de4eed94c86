//! Replay Example
//!
//! Feeds a recorded webhook delivery through a set of demo hook modules and
//! prints what was dispatched.
//!
//! ```text
//! payloads/label_created.json ──▶ Octoroute::setup([labels, pulls, audit, debugging])
//!                                      │
//!                                      └─▶ dispatch("label", payload) ──▶ report
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package octoroute-replay -- demos/replay/payloads/label_created.json
//! cargo run --package octoroute-replay -- --event pull_request payload.json --profile dev
//! ```
//!
//! The event name defaults to the file stem with the payload's action removed,
//! so `pull_request_opened.json` replays as `pull_request`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use octoroute::prelude::*;
use octoroute::runtime::SetupSummary;
use serde_json::Value;
use tracing::{info, warn};

// ============================================================================
// Hooks
// ============================================================================

/// Announces label changes in the octohook repository.
#[hook(label, actions(created, edited), repositories("doodla/octohook"))]
fn announce_label(event: &WebhookEvent) -> Result<()> {
    let EventPayload::Label(payload) = &event.payload else {
        bail!("label delivery without a label body");
    };
    info!(
        label = %payload.label.name,
        color = payload.label.color.as_deref().unwrap_or("-"),
        action = event.action.as_deref().unwrap_or("-"),
        "Label changed"
    );
    Ok(())
}

#[hook(label, actions(deleted))]
fn label_removed(event: &WebhookEvent) {
    warn!(repo = event.repository_name().unwrap_or("-"), "Label deleted");
}

#[hook(pull_request, actions(opened, reopened, ready_for_review))]
fn greet_pull_request(event: &WebhookEvent) -> Result<()> {
    let EventPayload::PullRequest(payload) = &event.payload else {
        bail!("pull_request delivery without a pull request body");
    };
    let pr = &payload.pull_request;
    info!(
        number = pr.number,
        title = %pr.title,
        head = %pr.head.ref_name,
        base = %pr.base.ref_name,
        draft = pr.draft.unwrap_or(false),
        "Pull request ready"
    );
    Ok(())
}

#[hook(pull_request, name = "pulls::audit")]
fn audit_pull_request(event: &WebhookEvent) {
    info!(
        action = event.action.as_deref().unwrap_or("-"),
        sender = event.sender.as_ref().map(|s| s.login.as_str()).unwrap_or("-"),
        "Pull request activity"
    );
}

#[hook(push)]
fn audit_push(event: &WebhookEvent) -> Result<()> {
    let EventPayload::Push(push) = &event.payload else {
        bail!("push delivery without a push body");
    };
    info!(
        git_ref = %push.ref_name,
        commits = push.commits.len(),
        forced = push.forced,
        "Push received"
    );
    Ok(())
}

#[hook(ping)]
fn pong(event: &WebhookEvent) {
    let zen = event.raw().get("zen").and_then(Value::as_str).unwrap_or("");
    info!(zen, "Ping received");
}

/// While loaded, only this hook sees label deliveries for octohook.
#[hook(label, repositories("doodla/octohook"), debug)]
fn trace_label(event: &WebhookEvent) {
    info!(raw = %event.raw(), "Debug label hook");
}

hook_module!(static LABELS = "labels" { ANNOUNCE_LABEL_HOOK, LABEL_REMOVED_HOOK });
hook_module!(static PULLS = "pulls" { GREET_PULL_REQUEST_HOOK, AUDIT_PULL_REQUEST_HOOK });
hook_module!(static AUDIT = "audit" { AUDIT_PUSH_HOOK, PONG_HOOK });
hook_module!(static DEBUGGING = "debugging" { TRACE_LABEL_HOOK });

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser)]
#[command(name = "octoroute-replay")]
#[command(about = "Replay a recorded GitHub webhook delivery through Octoroute hooks")]
#[command(version)]
struct Cli {
    /// JSON payload file
    payload: PathBuf,

    /// Event name (`X-GitHub-Event`); inferred from the file name if omitted
    #[arg(short, long)]
    event: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile
    #[arg(short, long)]
    profile: Option<String>,

    /// Replay the delivery this many times
    #[arg(long, default_value_t = 1)]
    repeat: u32,
}

/// Derives the event name from `<event>_<action>.json` or `<event>.json`.
fn infer_event(path: &Path, payload: &Value) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let action = payload.get("action").and_then(Value::as_str);
    let event = action
        .and_then(|a| stem.strip_suffix(a))
        .and_then(|s| s.strip_suffix('_'))
        .unwrap_or(stem);
    Some(event.to_string())
}

fn print_summary(summary: &SetupSummary) {
    println!("loaded modules: {}", summary.loaded.join(", "));
    if !summary.skipped.is_empty() {
        println!("skipped modules: {}", summary.skipped.join(", "));
    }
    println!("hooks registered: {}", summary.hooks);
}

fn print_report(event_name: &str, report: &DispatchReport) {
    let Some(event) = report.event else {
        println!("{event_name}: unknown event, nothing dispatched");
        return;
    };
    println!(
        "{event}: {} invoked, {} succeeded{}",
        report.invoked(),
        report.succeeded,
        if report.debug_mode { " (debug mode)" } else { "" }
    );
    for failure in &report.failed {
        println!("  {failure}");
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();

    let body = fs::read_to_string(&cli.payload)
        .with_context(|| format!("failed to read {}", cli.payload.display()))?;
    let payload: Value = serde_json::from_str(&body)
        .with_context(|| format!("{} is not valid JSON", cli.payload.display()))?;

    let event_name = match cli.event {
        Some(event) => event,
        None => infer_event(&cli.payload, &payload)
            .context("cannot infer the event name, pass --event")?,
    };

    let mut builder = Octoroute::builder();
    builder = match &cli.config {
        Some(path) => builder.config_file(path),
        None => builder.search_path(env!("CARGO_MANIFEST_DIR")),
    };
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    let octoroute = builder.build()?;

    let summary = octoroute.setup(&[LABELS, PULLS, AUDIT, DEBUGGING])?;
    print_summary(&summary);

    let mut failed = 0;
    for _ in 0..cli.repeat {
        let report = octoroute.dispatch(&event_name, &payload);
        print_report(&event_name, &report);
        failed += report.failed.len();
    }

    if failed > 0 {
        bail!("{failed} hook invocation(s) failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_infer_event_strips_action() {
        let payload = json!({ "action": "opened" });
        let event = infer_event(Path::new("payloads/pull_request_opened.json"), &payload);
        assert_eq!(event.as_deref(), Some("pull_request"));
    }

    #[test]
    fn test_infer_event_without_action() {
        let event = infer_event(Path::new("push.json"), &json!({ "ref": "refs/heads/main" }));
        assert_eq!(event.as_deref(), Some("push"));

        // Action that is not part of the name leaves the stem alone.
        let event = infer_event(Path::new("label.json"), &json!({ "action": "created" }));
        assert_eq!(event.as_deref(), Some("label"));
    }
}
