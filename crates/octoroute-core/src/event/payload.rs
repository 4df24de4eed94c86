//! Typed bodies for the webhook events handlers most often route on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    Branch, Comment, Commit, CommitUser, Hook, Issue, Label, Milestone, PullRequest, Release,
    Review, StatusCommit, User,
};

/// The event-specific part of a delivery.
///
/// Events without a dedicated shape, and deliveries whose body did not match
/// the expected shape, are [`EventPayload::Unmodeled`]; their fields remain
/// available through the raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Create(CreateEvent),
    Delete(DeleteEvent),
    IssueComment(IssueCommentEvent),
    Issues(IssuesEvent),
    Label(LabelEvent),
    Ping(PingEvent),
    PullRequest(PullRequestEvent),
    PullRequestReview(PullRequestReviewEvent),
    Push(PushEvent),
    Release(ReleaseEvent),
    Star(StarEvent),
    Status(StatusEvent),
    Unmodeled,
}

impl EventPayload {
    /// Returns `true` if no typed shape was produced for this delivery.
    pub fn is_unmodeled(&self) -> bool {
        matches!(self, EventPayload::Unmodeled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEvent {
    pub label: Label,
    pub changes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub issue: Issue,
    pub changes: Option<Value>,
    pub label: Option<Label>,
    pub assignee: Option<User>,
    pub milestone: Option<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub issue: Issue,
    pub comment: Comment,
    pub changes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub number: u64,
    pub pull_request: PullRequest,
    pub assignee: Option<User>,
    pub label: Option<Label>,
    pub requested_reviewer: Option<User>,
    /// Previous head SHA, set on `synchronize`.
    pub before: Option<String>,
    pub after: Option<String>,
    pub changes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestReviewEvent {
    pub review: Review,
    pub pull_request: PullRequest,
    pub changes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub forced: bool,
    pub base_ref: Option<String>,
    pub compare: Option<String>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub head_commit: Option<Commit>,
    pub pusher: CommitUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    pub release: Release,
    pub changes: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarEvent {
    pub starred_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub id: u64,
    pub sha: String,
    pub name: Option<String>,
    pub target_url: Option<String>,
    pub context: String,
    pub description: Option<String>,
    pub state: String,
    pub commit: StatusCommit,
    #[serde(default)]
    pub branches: Vec<Branch>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub ref_type: String,
    pub master_branch: Option<String>,
    pub description: Option<String>,
    pub pusher_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub ref_type: String,
    pub pusher_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingEvent {
    pub zen: Option<String>,
    pub hook_id: Option<u64>,
    pub hook: Option<Hook>,
}
