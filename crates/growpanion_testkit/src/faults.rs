//! Fault injection for rollback testing.

use growpanion_store::{
    Collection, Record, Settings, Store, StoreError, StoreResult, StoreTransaction,
};
use parking_lot::Mutex;

/// A store wrapper that fails a transactional write after a budget of
/// successful ones.
///
/// Reads always pass through. Each `put`, `clear`, `put_settings`, or
/// `clear_settings` consumes one unit of budget; the write that finds
/// the budget exhausted returns an error, which aborts the surrounding
/// transaction and must leave the inner store untouched.
///
/// # Example
///
/// ```rust
/// use growpanion_store::{Collection, MemoryStore, Record, Store};
/// use growpanion_testkit::FailingStore;
///
/// let store = FailingStore::new(MemoryStore::new(), 1);
/// let result = store.with_transaction(&mut |txn| {
///     txn.put(Collection::Grows, Record::new("ok"))?;
///     txn.put(Collection::Grows, Record::new("fails"))
/// });
/// assert!(result.is_err());
/// assert!(store.inner().to_array(Collection::Grows).unwrap().is_empty());
/// ```
#[derive(Debug)]
pub struct FailingStore<S> {
    inner: S,
    budget: Mutex<usize>,
}

impl<S: Store> FailingStore<S> {
    /// Wraps a store, allowing `write_budget` writes before failing.
    #[must_use]
    pub fn new(inner: S, write_budget: usize) -> Self {
        Self {
            inner,
            budget: Mutex::new(write_budget),
        }
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Resets the write budget.
    pub fn set_budget(&self, write_budget: usize) {
        *self.budget.lock() = write_budget;
    }

    fn consume(&self) -> StoreResult<()> {
        let mut budget = self.budget.lock();
        if *budget == 0 {
            return Err(StoreError::aborted("injected write failure"));
        }
        *budget -= 1;
        Ok(())
    }
}

struct FaultTransaction<'a, 'b, S> {
    inner: &'a mut dyn StoreTransaction,
    store: &'b FailingStore<S>,
}

impl<S: Store> StoreTransaction for FaultTransaction<'_, '_, S> {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        self.inner.get(collection, id)
    }

    fn put(&mut self, collection: Collection, record: Record) -> StoreResult<()> {
        self.store.consume()?;
        self.inner.put(collection, record)
    }

    fn clear(&mut self, collection: Collection) -> StoreResult<()> {
        self.store.consume()?;
        self.inner.clear(collection)
    }

    fn settings(&self) -> StoreResult<Option<Settings>> {
        self.inner.settings()
    }

    fn put_settings(&mut self, settings: Settings) -> StoreResult<()> {
        self.store.consume()?;
        self.inner.put_settings(settings)
    }

    fn clear_settings(&mut self) -> StoreResult<()> {
        self.store.consume()?;
        self.inner.clear_settings()
    }
}

impl<S: Store> Store for FailingStore<S> {
    fn to_array(&self, collection: Collection) -> StoreResult<Vec<Record>> {
        self.inner.to_array(collection)
    }

    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        self.inner.get(collection, id)
    }

    fn settings(&self) -> StoreResult<Option<Settings>> {
        self.inner.settings()
    }

    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTransaction) -> StoreResult<()>,
    ) -> StoreResult<()> {
        self.inner.with_transaction(&mut |txn| {
            let mut faulty = FaultTransaction {
                inner: txn,
                store: self,
            };
            f(&mut faulty)
        })
    }
}
