//! Registration options.
//!
//! [`Hook`] is the builder handed to
//! [`HookRegistry::register`](crate::HookRegistry::register):
//!
//! ```rust,ignore
//! registry.register(
//!     Hook::on(EventType::PullRequest)
//!         .actions([ActionType::Opened, ActionType::Synchronize])
//!         .repository("doodla/octohook")
//!         .name("ci-trigger"),
//!     trigger_ci,
//! )?;
//! ```
//!
//! The `try_*` variants accept wire strings and fail with a
//! [`RegistrationError`] when a string does not parse, which is what the
//! configuration-driven paths use.

use std::collections::BTreeSet;

use octoroute_core::{ActionType, EventType};

use crate::error::{RegistrationError, RegistrationResult};
use crate::filter::{ActionKey, RepoKey, validate_repository};

/// Options of one hook registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    event: EventType,
    actions: Vec<ActionType>,
    repositories: Vec<String>,
    debug: bool,
    name: Option<String>,
}

impl Hook {
    /// Starts a registration for `event`, matching any action in any repository.
    pub fn on(event: EventType) -> Self {
        Self {
            event,
            actions: Vec::new(),
            repositories: Vec::new(),
            debug: false,
            name: None,
        }
    }

    /// Starts a registration from an event name.
    pub fn try_on(event: &str) -> RegistrationResult<Self> {
        Ok(Self::on(event.parse()?))
    }

    /// Restricts the hook to the given actions. An empty set means any action.
    pub fn actions(mut self, actions: impl IntoIterator<Item = ActionType>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Adds one action to the filter.
    pub fn action(mut self, action: ActionType) -> Self {
        self.actions.push(action);
        self
    }

    /// Restricts the hook to the given action names.
    pub fn try_actions<I, S>(mut self, actions: I) -> RegistrationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for action in actions {
            self.actions.push(action.as_ref().parse()?);
        }
        Ok(self)
    }

    /// Restricts the hook to the given `owner/name` repositories. An empty set
    /// means any repository.
    ///
    /// Names are validated when the hook is registered.
    pub fn repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories.extend(repositories.into_iter().map(Into::into));
        self
    }

    /// Adds one repository to the filter.
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repositories.push(repository.into());
        self
    }

    /// Marks the hook as a debug hook.
    ///
    /// While any debug hook is registered for an event type, only debug hooks
    /// fire for that event type.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the name used to identify the handler in logs and reports.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn event(&self) -> EventType {
        self.event
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Validates the options and normalizes them into the registry cells the
    /// hook occupies.
    pub(crate) fn resolve(self) -> RegistrationResult<ResolvedHook> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(RegistrationError::EmptyName);
        }
        for repository in &self.repositories {
            validate_repository(repository)?;
        }

        let actions: Vec<ActionType> = BTreeSet::from_iter(self.actions).into_iter().collect();
        let repositories: Vec<String> = BTreeSet::from_iter(self.repositories).into_iter().collect();

        let action_keys: Vec<ActionKey> = if actions.is_empty() {
            vec![ActionKey::Any]
        } else {
            actions.iter().copied().map(ActionKey::Action).collect()
        };
        let repo_keys: Vec<RepoKey> = if repositories.is_empty() {
            vec![RepoKey::Any]
        } else {
            repositories.iter().cloned().map(RepoKey::Named).collect()
        };

        let mut cells = Vec::with_capacity(action_keys.len() * repo_keys.len() + repo_keys.len());
        for action in &action_keys {
            for repo in &repo_keys {
                cells.push((*action, repo.clone()));
            }
        }
        if self.debug {
            for repo in &repo_keys {
                cells.push((ActionKey::Debug, repo.clone()));
            }
        }

        Ok(ResolvedHook {
            event: self.event,
            actions,
            repositories,
            debug: self.debug,
            name: self.name,
            cells,
        })
    }
}

/// A validated hook together with the `(action, repository)` cells it occupies.
#[derive(Debug)]
pub(crate) struct ResolvedHook {
    pub event: EventType,
    pub actions: Vec<ActionType>,
    pub repositories: Vec<String>,
    pub debug: bool,
    pub name: Option<String>,
    pub cells: Vec<(ActionKey, RepoKey)>,
}

impl ResolvedHook {
    /// Any action, any repository, no name. Needs no validation.
    pub fn wildcard(event: EventType) -> Self {
        Self {
            event,
            actions: Vec::new(),
            repositories: Vec::new(),
            debug: false,
            name: None,
            cells: vec![(ActionKey::Any, RepoKey::Any)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hook_occupies_wildcard_cell() {
        let resolved = Hook::on(EventType::Label).resolve().unwrap();
        assert_eq!(resolved.cells, vec![(ActionKey::Any, RepoKey::Any)]);
        assert!(!resolved.debug);
    }

    #[test]
    fn test_cross_product_of_actions_and_repositories() {
        let resolved = Hook::on(EventType::Label)
            .actions([ActionType::Created, ActionType::Edited])
            .repositories(["a/one", "b/two"])
            .resolve()
            .unwrap();

        assert_eq!(resolved.cells.len(), 4);
        assert!(resolved.cells.contains(&(ActionKey::Action(ActionType::Edited), RepoKey::Named("b/two".into()))));
        assert!(!resolved.cells.iter().any(|(a, _)| *a == ActionKey::Any));
    }

    #[test]
    fn test_debug_hook_also_occupies_debug_cells() {
        let resolved = Hook::on(EventType::Label)
            .action(ActionType::Created)
            .repository("o/r")
            .debug(true)
            .resolve()
            .unwrap();

        assert_eq!(
            resolved.cells,
            vec![
                (ActionKey::Action(ActionType::Created), RepoKey::Named("o/r".into())),
                (ActionKey::Debug, RepoKey::Named("o/r".into())),
            ]
        );
    }

    #[test]
    fn test_duplicate_filters_are_collapsed() {
        let resolved = Hook::on(EventType::Issues)
            .actions([ActionType::Opened, ActionType::Opened])
            .repositories(["o/r", "o/r"])
            .resolve()
            .unwrap();
        assert_eq!(resolved.cells.len(), 1);
    }

    #[test]
    fn test_try_builders_parse_wire_strings() {
        let hook = Hook::try_on("pull_request")
            .unwrap()
            .try_actions(["opened", "closed"])
            .unwrap();
        assert_eq!(hook.event(), EventType::PullRequest);

        assert!(Hook::try_on("not_an_event").is_err());
        assert!(matches!(
            Hook::on(EventType::Label).try_actions(["exploded"]),
            Err(RegistrationError::Event(_))
        ));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        assert!(matches!(
            Hook::on(EventType::Label).repository("no-slash").resolve(),
            Err(RegistrationError::InvalidRepository { .. })
        ));
        assert_eq!(
            Hook::on(EventType::Label).name("  ").resolve().unwrap_err(),
            RegistrationError::EmptyName
        );
    }
}
