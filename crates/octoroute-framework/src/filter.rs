//! Keys of the registry tree.
//!
//! Below the event type, the tree is indexed on two axes:
//!
//! ```text
//! EventType ──▶ ActionKey ──▶ RepoKey ──▶ [HookEntry]
//!               Any            Any
//!               Debug          Named("owner/name")
//!               Action(..)
//! ```

use std::fmt;

use octoroute_core::ActionType;

use crate::error::{RegistrationError, RegistrationResult};

/// Storage key on the action axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKey {
    /// Handlers registered without an action filter.
    Any,
    /// Handlers registered with the debug flag.
    Debug,
    /// Handlers registered for one specific action.
    Action(ActionType),
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKey::Any => f.write_str("*"),
            ActionKey::Debug => f.write_str("debug"),
            ActionKey::Action(action) => f.write_str(action.as_str()),
        }
    }
}

/// Storage key on the repository axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RepoKey {
    /// Handlers registered without a repository filter.
    Any,
    /// Handlers registered for one `owner/name` repository.
    Named(String),
}

impl RepoKey {
    /// Builds a validated named key.
    pub fn named(repository: &str) -> RegistrationResult<Self> {
        validate_repository(repository)?;
        Ok(RepoKey::Named(repository.to_string()))
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoKey::Any => f.write_str("*"),
            RepoKey::Named(name) => f.write_str(name),
        }
    }
}

/// Checks that a repository filter has the form `owner/name`.
pub fn validate_repository(repository: &str) -> RegistrationResult<()> {
    let invalid = |reason| Err(RegistrationError::invalid_repository(repository, reason));

    if repository.chars().any(char::is_whitespace) {
        return invalid("must not contain whitespace");
    }
    let Some((owner, name)) = repository.split_once('/') else {
        return invalid("expected 'owner/name'");
    };
    if owner.is_empty() || name.is_empty() {
        return invalid("owner and name must both be non-empty");
    }
    if name.contains('/') {
        return invalid("expected exactly one '/'");
    }
    Ok(())
}
