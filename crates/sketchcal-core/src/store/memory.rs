//! In-memory document store.

use super::DocumentStore;
use crate::model::State;
use std::sync::Arc;

/// Single-process store for tests and headless sessions.
///
/// Snapshots are shared `Arc<State>` values. A write clones the state only
/// when an older snapshot is still held somewhere, so readers keep seeing
/// exactly what they were handed.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    current: Arc<State>,
    version: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding a fresh one-page document.
    pub fn new() -> Self {
        Self::from_state(State::new_empty())
    }

    /// Create a store around an existing document.
    pub fn from_state(state: State) -> Self {
        Self {
            current: Arc::new(state),
            version: 0,
        }
    }

    /// Apply a change that originated elsewhere (another peer, a sync
    /// layer). Goes through the same publish path as local edits.
    pub fn apply_remote(&mut self, change: impl FnOnce(&mut State)) {
        log::debug!("Applying remote change at version {}", self.version);
        self.mutate(change);
    }
}

impl DocumentStore for MemoryStore {
    fn snapshot(&self) -> Arc<State> {
        Arc::clone(&self.current)
    }

    fn mutate<R>(&mut self, change: impl FnOnce(&mut State) -> R) -> R {
        let result = change(Arc::make_mut(&mut self.current));
        self.version += 1;
        result
    }

    fn version(&self) -> u64 {
        self.version
    }
}
