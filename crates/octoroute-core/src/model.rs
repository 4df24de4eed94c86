//! Payload model types shared across webhook events.
//!
//! Only the fields handlers commonly route on are modelled. Anything else is
//! still reachable through [`WebhookEvent::raw`](crate::WebhookEvent::raw) or
//! by deserializing a host-defined shape with
//! [`WebhookEvent::deserialize`](crate::WebhookEvent::deserialize).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GitHub account (user, bot or organization acting as a user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    pub node_id: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub site_admin: Option<bool>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// The repository a delivery originated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    /// `owner/name`, the key repository filters match against.
    pub full_name: String,
    pub owner: Option<User>,
    pub private: Option<bool>,
    pub fork: Option<bool>,
    pub description: Option<String>,
    pub html_url: Option<String>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    pub id: u64,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// GitHub App installation that received the delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub id: u64,
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<u64>,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub default: Option<bool>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: Option<String>,
    pub body: Option<String>,
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<User>,
    pub html_url: Option<String>,
    /// Present only when the issue is a pull request.
    pub pull_request: Option<Value>,
}

impl Issue {
    /// Returns `true` if this issue is the conversation side of a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: Option<String>,
    pub user: Option<User>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// One side (head or base) of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub label: Option<String>,
    pub repo: Option<Repository>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub state: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub user: Option<User>,
    pub draft: Option<bool>,
    pub merged: Option<bool>,
    pub merge_commit_sha: Option<String>,
    pub head: GitRef,
    pub base: GitRef,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub state: String,
    pub body: Option<String>,
    pub user: Option<User>,
    pub commit_id: Option<String>,
    pub submitted_at: Option<String>,
    pub html_url: Option<String>,
}

/// Author or committer identity inside a push payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitUser {
    pub name: String,
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub timestamp: Option<String>,
    pub url: Option<String>,
    pub distinct: Option<bool>,
    pub author: Option<CommitUser>,
    pub committer: Option<CommitUser>,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub target_commitish: Option<String>,
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub author: Option<User>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub published_at: Option<String>,
}

/// Webhook configuration echoed back in `ping` and `meta` deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub active: Option<bool>,
    #[serde(default)]
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCommit {
    pub sha: String,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub protected: Option<bool>,
}
