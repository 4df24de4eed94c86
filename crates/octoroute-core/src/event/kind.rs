//! Event and action tags.
//!
//! Both enumerations are closed sets whose wire value is the snake_case string
//! GitHub sends in the `X-GitHub-Event` header and the payload's `action`
//! field respectively. The same string is used as the registry map key.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EventError;

/// Generates a string-backed tag enum with `as_str`, `Display`, `FromStr`
/// and serde impls that all agree on the wire value.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident / $err:ident {
            $( $variant:ident => $wire:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $(
                #[doc = concat!("`", $wire, "`")]
                $variant,
            )*
        }

        impl $name {
            /// Every tag, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// Returns the wire value of this tag.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EventError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)*
                    other => Err(EventError::$err(other.to_string())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// The category of a webhook delivery.
    pub enum EventType / UnknownEvent {
        BranchProtectionRule => "branch_protection_rule",
        CheckRun => "check_run",
        CheckSuite => "check_suite",
        CodeScanningAlert => "code_scanning_alert",
        CommitComment => "commit_comment",
        ContentReference => "content_reference",
        Create => "create",
        Delete => "delete",
        DeployKey => "deploy_key",
        Deployment => "deployment",
        DeploymentStatus => "deployment_status",
        Discussion => "discussion",
        DiscussionComment => "discussion_comment",
        Fork => "fork",
        GithubAppAuthorization => "github_app_authorization",
        Gollum => "gollum",
        Installation => "installation",
        InstallationRepositories => "installation_repositories",
        InstallationTarget => "installation_target",
        IssueComment => "issue_comment",
        Issues => "issues",
        Label => "label",
        MarketplacePurchase => "marketplace_purchase",
        Member => "member",
        Membership => "membership",
        MergeGroup => "merge_group",
        Meta => "meta",
        Milestone => "milestone",
        OrgBlock => "org_block",
        Organization => "organization",
        Package => "package",
        PageBuild => "page_build",
        Ping => "ping",
        Project => "project",
        ProjectCard => "project_card",
        ProjectColumn => "project_column",
        ProjectsV2Item => "projects_v2_item",
        Public => "public",
        PullRequest => "pull_request",
        PullRequestReview => "pull_request_review",
        PullRequestReviewComment => "pull_request_review_comment",
        PullRequestReviewThread => "pull_request_review_thread",
        Push => "push",
        RegistryPackage => "registry_package",
        Release => "release",
        Repository => "repository",
        RepositoryDispatch => "repository_dispatch",
        RepositoryImport => "repository_import",
        RepositoryVulnerabilityAlert => "repository_vulnerability_alert",
        SecretScanningAlert => "secret_scanning_alert",
        SecurityAdvisory => "security_advisory",
        Sponsorship => "sponsorship",
        Star => "star",
        Status => "status",
        Team => "team",
        TeamAdd => "team_add",
        Watch => "watch",
        WorkflowDispatch => "workflow_dispatch",
        WorkflowJob => "workflow_job",
        WorkflowRun => "workflow_run",
    }
}

string_enum! {
    /// The sub-action carried in a payload's `action` field.
    pub enum ActionType / UnknownAction {
        Added => "added",
        Answered => "answered",
        Approved => "approved",
        Archived => "archived",
        Assigned => "assigned",
        AutoMergeDisabled => "auto_merge_disabled",
        AutoMergeEnabled => "auto_merge_enabled",
        Blocked => "blocked",
        Cancelled => "cancelled",
        CategoryChanged => "category_changed",
        Closed => "closed",
        Completed => "completed",
        Converted => "converted",
        ConvertedToDraft => "converted_to_draft",
        Created => "created",
        Deleted => "deleted",
        Demilestoned => "demilestoned",
        Dequeued => "dequeued",
        Dismissed => "dismissed",
        Edited => "edited",
        Enqueued => "enqueued",
        Fixed => "fixed",
        InProgress => "in_progress",
        Labeled => "labeled",
        Locked => "locked",
        MemberAdded => "member_added",
        MemberInvited => "member_invited",
        MemberRemoved => "member_removed",
        Milestoned => "milestoned",
        Moved => "moved",
        NewPermissionsAccepted => "new_permissions_accepted",
        Opened => "opened",
        PendingCancellation => "pending_cancellation",
        PendingChange => "pending_change",
        PendingChangeCancelled => "pending_change_cancelled",
        PendingTierChange => "pending_tier_change",
        Performed => "performed",
        Pinned => "pinned",
        Prereleased => "prereleased",
        Privatized => "privatized",
        Publicized => "publicized",
        Published => "published",
        Purchased => "purchased",
        Queued => "queued",
        ReadyForReview => "ready_for_review",
        Released => "released",
        Removed => "removed",
        Renamed => "renamed",
        Reopened => "reopened",
        ReopenedByUser => "reopened_by_user",
        Requested => "requested",
        RequestedAction => "requested_action",
        Rerequested => "rerequested",
        Resolved => "resolved",
        ReviewRequestRemoved => "review_request_removed",
        ReviewRequested => "review_requested",
        Revoked => "revoked",
        Started => "started",
        Submitted => "submitted",
        Suspend => "suspend",
        Synchronize => "synchronize",
        TierChanged => "tier_changed",
        Transferred => "transferred",
        Unanswered => "unanswered",
        Unarchived => "unarchived",
        Unassigned => "unassigned",
        Unblocked => "unblocked",
        Unlabeled => "unlabeled",
        Unlocked => "unlocked",
        Unpinned => "unpinned",
        Unpublished => "unpublished",
        Unresolved => "unresolved",
        Unsuspend => "unsuspend",
        Updated => "updated",
        Waiting => "waiting",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_parse_back() {
        for event in EventType::ALL {
            assert_eq!(event.as_str().parse::<EventType>(), Ok(*event));
        }
        for action in ActionType::ALL {
            assert_eq!(action.as_str().parse::<ActionType>(), Ok(*action));
        }
    }

    #[test]
    fn unknown_strings_are_rejected() {
        assert_eq!(
            "totally_unknown_event_name".parse::<EventType>(),
            Err(EventError::UnknownEvent("totally_unknown_event_name".into()))
        );
        assert_eq!(
            "exploded".parse::<ActionType>(),
            Err(EventError::UnknownAction("exploded".into()))
        );
        // Tags are case-sensitive on the wire.
        assert!("Label".parse::<EventType>().is_err());
    }

    #[test]
    fn serde_uses_wire_value() {
        let json = serde_json::to_string(&EventType::PullRequestReview).unwrap();
        assert_eq!(json, "\"pull_request_review\"");

        let action: ActionType = serde_json::from_str("\"review_requested\"").unwrap();
        assert_eq!(action, ActionType::ReviewRequested);

        assert!(serde_json::from_str::<ActionType>("\"nope\"").is_err());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(EventType::Label.to_string(), "label");
        assert_eq!(ActionType::InProgress.to_string(), "in_progress");
    }
}
