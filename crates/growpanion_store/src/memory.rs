//! In-memory store backend for testing.

use crate::backend::{Collection, Store, StoreTransaction};
use crate::error::StoreResult;
use crate::record::{Record, Settings};
use crate::state::{StateTransaction, StoreState};
use parking_lot::RwLock;

/// An in-memory store.
///
/// This backend keeps all collections in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use growpanion_store::{Collection, MemoryStore, Record, Store};
///
/// let store = MemoryStore::new();
/// store
///     .with_transaction(&mut |txn| txn.put(Collection::Plants, Record::new("p1")))
///     .unwrap();
/// assert!(store.get(Collection::Plants, "p1").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given state.
    ///
    /// Useful for setting up test scenarios.
    #[must_use]
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Returns a copy of the full store contents.
    ///
    /// Useful for asserting on store state in tests.
    #[must_use]
    pub fn snapshot_state(&self) -> StoreState {
        self.state.read().clone()
    }
}

impl Store for MemoryStore {
    fn to_array(&self, collection: Collection) -> StoreResult<Vec<Record>> {
        Ok(self.state.read().records(collection).clone())
    }

    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        Ok(self.state.read().find(collection, id).cloned())
    }

    fn settings(&self) -> StoreResult<Option<Settings>> {
        Ok(self.state.read().settings.clone())
    }

    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTransaction) -> StoreResult<()>,
    ) -> StoreResult<()> {
        let mut txn = StateTransaction::new(self.state.read().clone());
        f(&mut txn)?;
        *self.state.write() = txn.into_state();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn commit_makes_writes_visible() {
        let store = MemoryStore::new();

        store
            .with_transaction(&mut |txn| {
                txn.put(Collection::Grows, Record::new("g1"))?;
                txn.put_settings(Settings::new().with_field("theme", "dark"))?;
                Ok(())
            })
            .unwrap();

        assert!(store.get(Collection::Grows, "g1").unwrap().is_some());
        assert!(store.settings().unwrap().is_some());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let store = MemoryStore::new();
        store
            .with_transaction(&mut |txn| txn.put(Collection::Grows, Record::new("keep")))
            .unwrap();

        let result = store.with_transaction(&mut |txn| {
            txn.clear(Collection::Grows)?;
            txn.put(Collection::Grows, Record::new("discard"))?;
            Err(StoreError::aborted("test"))
        });

        assert!(result.is_err());
        let grows = store.to_array(Collection::Grows).unwrap();
        assert_eq!(grows.len(), 1);
        assert_eq!(grows[0].id, "keep");
    }

    #[test]
    fn transaction_reads_see_own_writes() {
        let store = MemoryStore::new();

        store
            .with_transaction(&mut |txn| {
                txn.put(Collection::Plants, Record::new("p1"))?;
                assert!(txn.get(Collection::Plants, "p1")?.is_some());
                Ok(())
            })
            .unwrap();
    }
}
