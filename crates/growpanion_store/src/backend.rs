//! Store trait definitions.

use crate::error::StoreResult;
use crate::record::{Record, Settings};

/// One of the three entity collections.
///
/// Settings is not listed here: it is a singleton with its own
/// accessors, not a keyed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Grow cycles.
    Grows,
    /// Plants, each belonging to a grow.
    Plants,
    /// Saved fertilizer mixes.
    FertilizerMixes,
}

impl Collection {
    /// All collections, in the fixed import order.
    pub const ALL: [Collection; 3] = [
        Collection::Grows,
        Collection::Plants,
        Collection::FertilizerMixes,
    ];

    /// Returns the collection's display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::Grows => "grows",
            Collection::Plants => "plants",
            Collection::FertilizerMixes => "fertilizerMixes",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The application's document store.
///
/// Stores hold the three entity collections plus the singleton settings
/// record. Entities are opaque: implementations index by `id` and never
/// interpret other fields.
///
/// # Invariants
///
/// - `put` with an existing id replaces that entity; ids stay unique
///   within a collection
/// - `to_array` preserves insertion order
/// - Writes are only possible through [`with_transaction`](Store::with_transaction)
///   and become visible atomically on commit
///
/// # Implementors
///
/// - [`super::MemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait Store: Send + Sync {
    /// Returns all entities in a collection, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn to_array(&self, collection: Collection) -> StoreResult<Vec<Record>>;

    /// Returns the entity with the given id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>>;

    /// Returns the settings record, or `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn settings(&self) -> StoreResult<Option<Settings>>;

    /// Runs `f` inside a transaction.
    ///
    /// All writes made through the [`StoreTransaction`] are buffered and
    /// committed atomically when `f` returns `Ok`. If `f` returns `Err`,
    /// nothing is committed and the store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a commit failure.
    fn with_transaction(
        &self,
        f: &mut dyn FnMut(&mut dyn StoreTransaction) -> StoreResult<()>,
    ) -> StoreResult<()>;
}

/// Handle to an in-progress store transaction.
///
/// Reads observe writes already made within the same transaction.
pub trait StoreTransaction {
    /// Returns the entity with the given id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>>;

    /// Inserts the entity, replacing any existing entity with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be buffered.
    fn put(&mut self, collection: Collection, record: Record) -> StoreResult<()>;

    /// Removes every entity from the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be buffered.
    fn clear(&mut self, collection: Collection) -> StoreResult<()>;

    /// Returns the settings record, or `None` if never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying read fails.
    fn settings(&self) -> StoreResult<Option<Settings>>;

    /// Replaces the settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be buffered.
    fn put_settings(&mut self, settings: Settings) -> StoreResult<()>;

    /// Removes the settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be buffered.
    fn clear_settings(&mut self) -> StoreResult<()>;
}
