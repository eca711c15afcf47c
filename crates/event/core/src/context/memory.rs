//! In-memory game state backed by `RwLock`ed maps.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use super::{GameStateContext, OwnerId};

/// Reference [`GameStateContext`] for tests, tools, and small hosts.
///
/// A poisoned lock is recovered rather than propagated: every write is a
/// single map insert, so the maps are never left half-updated.
#[derive(Debug, Default)]
pub struct InMemoryGameState {
    variables: RwLock<HashMap<String, i32>>,
    switches: RwLock<HashMap<String, bool>>,
    self_switches: RwLock<HashMap<(OwnerId, String), bool>>,
}

impl InMemoryGameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variable(self, name: impl Into<String>, value: i32) -> Self {
        self.variables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_switch(self, name: impl Into<String>, value: bool) -> Self {
        self.switches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value);
        self
    }

    /// Sorted copy of all variables (for debugging and assertions).
    pub fn variables(&self) -> BTreeMap<String, i32> {
        self.variables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }

    /// Sorted copy of all switches (for debugging and assertions).
    pub fn switches(&self) -> BTreeMap<String, bool> {
        self.switches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| (name.clone(), *value))
            .collect()
    }
}

impl GameStateContext for InMemoryGameState {
    fn variable(&self, name: &str) -> i32 {
        self.variables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    fn set_variable(&self, name: &str, value: i32) {
        self.variables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), value);
    }

    fn switch(&self, name: &str) -> bool {
        self.switches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(false)
    }

    fn set_switch(&self, name: &str, value: bool) {
        self.switches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), value);
    }

    fn self_switch(&self, owner: OwnerId, name: &str) -> bool {
        self.self_switches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(owner, name.to_owned()))
            .copied()
            .unwrap_or(false)
    }

    fn set_self_switch(&self, owner: OwnerId, name: &str, value: bool) {
        self.self_switches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((owner, name.to_owned()), value);
    }
}
