//! The registry tree and candidate resolution.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use octoroute_core::{ActionType, EventType};

use crate::filter::{ActionKey, RepoKey};
use crate::handler::{HandlerId, HookEntry};

type RepoCells = HashMap<RepoKey, Vec<Arc<HookEntry>>>;
type ActionCells = HashMap<ActionKey, RepoCells>;

/// `EventType -> ActionKey -> RepoKey -> [HookEntry]`.
///
/// A registration with several actions or repositories is stored once per
/// cell it occupies; every copy is the same `Arc`.
#[derive(Debug, Default)]
pub struct RegistryTree {
    events: HashMap<EventType, ActionCells>,
    registrations: usize,
}

/// The handlers selected for one delivery.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Whether debug hooks suppressed every other handler.
    pub debug_mode: bool,
    /// Matching entries, deduplicated, in registration order.
    pub handlers: Vec<Arc<HookEntry>>,
}

impl RegistryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` into every listed cell.
    pub fn insert(&mut self, entry: Arc<HookEntry>, cells: &[(ActionKey, RepoKey)]) {
        let actions = self.events.entry(entry.event).or_default();
        for (action, repo) in cells {
            actions
                .entry(*action)
                .or_default()
                .entry(repo.clone())
                .or_default()
                .push(Arc::clone(&entry));
        }
        self.registrations += 1;
    }

    /// Returns the entries stored in one cell.
    pub fn cell(&self, event: EventType, action: ActionKey, repo: &RepoKey) -> &[Arc<HookEntry>] {
        self.events
            .get(&event)
            .and_then(|actions| actions.get(&action))
            .and_then(|repos| repos.get(repo))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if any debug hook is registered for `event`.
    pub fn is_debug(&self, event: EventType) -> bool {
        self.events
            .get(&event)
            .and_then(|actions| actions.get(&ActionKey::Debug))
            .is_some_and(|repos| repos.values().any(|cell| !cell.is_empty()))
    }

    /// Selects the handlers for a delivery.
    ///
    /// In debug mode only debug hooks for any repository or for `repository`
    /// are selected. Otherwise the any-action hooks for any repository or for
    /// `repository`, plus the hooks for `action` for any repository or for
    /// `repository`.
    pub fn resolve(
        &self,
        event: EventType,
        action: Option<ActionType>,
        repository: Option<&str>,
    ) -> Resolution {
        let debug_mode = self.is_debug(event);
        let any = RepoKey::Any;
        let repo_key = repository.map(|r| RepoKey::Named(r.to_string()));

        let mut cells: Vec<(ActionKey, Option<&RepoKey>)> = Vec::with_capacity(4);
        if debug_mode {
            cells.push((ActionKey::Debug, Some(&any)));
            cells.push((ActionKey::Debug, repo_key.as_ref()));
        } else {
            cells.push((ActionKey::Any, Some(&any)));
            cells.push((ActionKey::Any, repo_key.as_ref()));
            if let Some(action) = action {
                cells.push((ActionKey::Action(action), Some(&any)));
                cells.push((ActionKey::Action(action), repo_key.as_ref()));
            }
        }

        let mut selected: BTreeMap<HandlerId, Arc<HookEntry>> = BTreeMap::new();
        for (action, repo) in cells {
            let Some(repo) = repo else { continue };
            for entry in self.cell(event, action, repo) {
                selected.entry(entry.id).or_insert_with(|| Arc::clone(entry));
            }
        }

        Resolution {
            debug_mode,
            handlers: selected.into_values().collect(),
        }
    }

    /// Number of registrations (not cells).
    pub fn len(&self) -> usize {
        self.registrations
    }

    pub fn is_empty(&self) -> bool {
        self.registrations == 0
    }

    /// Event types with at least one registration.
    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.events.keys().copied()
    }

    /// Total number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.events
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.registrations = 0;
    }
}
