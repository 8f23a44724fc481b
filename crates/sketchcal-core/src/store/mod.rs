//! Document store contract.
//!
//! The core never owns the replicated document. It reads the latest published
//! snapshot and funnels every edit through [`DocumentStore::mutate`], which
//! hands the closure exclusive access to a draft and publishes the result as
//! the next snapshot when the closure returns. Replication, persistence and
//! merging belong to the implementation.

mod memory;

pub use memory::MemoryStore;

use crate::model::State;
use std::sync::Arc;

/// A replicated document handle.
pub trait DocumentStore {
    /// The latest published snapshot. Snapshots are immutable; holding one
    /// never blocks writers.
    fn snapshot(&self) -> Arc<State>;

    /// Apply `change` to a draft of the current state and publish it.
    ///
    /// The draft is only reachable for the duration of the call.
    fn mutate<R>(&mut self, change: impl FnOnce(&mut State) -> R) -> R;

    /// Number of snapshots published so far.
    fn version(&self) -> u64;
}
