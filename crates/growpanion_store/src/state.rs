//! In-memory store state and the transaction handle over it.

use crate::backend::{Collection, StoreTransaction};
use crate::error::StoreResult;
use crate::record::{Record, Settings};
use serde::{Deserialize, Serialize};

/// The full contents of a store: three collections plus settings.
///
/// Both backends keep their working copy in this shape. A transaction
/// mutates a clone; the backend swaps the clone in on commit, so an
/// aborted transaction leaves the original untouched.
///
/// Serializes in the application's document layout (camelCase keys) so
/// [`super::FileStore`] can persist it directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Grow entities, in insertion order.
    #[serde(default)]
    pub grows: Vec<Record>,
    /// Plant entities, in insertion order.
    #[serde(default)]
    pub plants: Vec<Record>,
    /// Fertilizer mix entities, in insertion order.
    #[serde(default)]
    pub fertilizer_mixes: Vec<Record>,
    /// The singleton settings record, if any.
    #[serde(default)]
    pub settings: Option<Settings>,
}

impl StoreState {
    /// Returns the records of a collection.
    #[must_use]
    pub fn records(&self, collection: Collection) -> &Vec<Record> {
        match collection {
            Collection::Grows => &self.grows,
            Collection::Plants => &self.plants,
            Collection::FertilizerMixes => &self.fertilizer_mixes,
        }
    }

    fn records_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        match collection {
            Collection::Grows => &mut self.grows,
            Collection::Plants => &mut self.plants,
            Collection::FertilizerMixes => &mut self.fertilizer_mixes,
        }
    }

    /// Finds an entity by id.
    #[must_use]
    pub fn find(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.records(collection).iter().find(|r| r.id == id)
    }

    /// Inserts an entity, replacing any existing entity with the same id.
    pub fn upsert(&mut self, collection: Collection, record: Record) {
        let records = self.records_mut(collection);
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Removes all entities from a collection.
    pub fn clear(&mut self, collection: Collection) {
        self.records_mut(collection).clear();
    }
}

/// Transaction handle over a cloned [`StoreState`].
///
/// Backends hand this to the transaction closure and decide afterwards
/// whether the mutated state replaces the committed one.
#[derive(Debug)]
pub struct StateTransaction {
    state: StoreState,
}

impl StateTransaction {
    /// Starts a transaction over a copy of the committed state.
    #[must_use]
    pub fn new(state: StoreState) -> Self {
        Self { state }
    }

    /// Consumes the transaction, yielding the state to commit.
    #[must_use]
    pub fn into_state(self) -> StoreState {
        self.state
    }
}

impl StoreTransaction for StateTransaction {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Record>> {
        Ok(self.state.find(collection, id).cloned())
    }

    fn put(&mut self, collection: Collection, record: Record) -> StoreResult<()> {
        self.state.upsert(collection, record);
        Ok(())
    }

    fn clear(&mut self, collection: Collection) -> StoreResult<()> {
        self.state.clear(collection);
        Ok(())
    }

    fn settings(&self) -> StoreResult<Option<Settings>> {
        Ok(self.state.settings.clone())
    }

    fn put_settings(&mut self, settings: Settings) -> StoreResult<()> {
        self.state.settings = Some(settings);
        Ok(())
    }

    fn clear_settings(&mut self) -> StoreResult<()> {
        self.state.settings = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_by_id() {
        let mut state = StoreState::default();
        state.upsert(Collection::Grows, Record::new("g1").with_field("week", 1));
        state.upsert(Collection::Grows, Record::new("g1").with_field("week", 2));

        assert_eq!(state.grows.len(), 1);
        assert_eq!(state.grows[0].fields["week"], 2);
    }

    #[test]
    fn upsert_preserves_insertion_order() {
        let mut state = StoreState::default();
        state.upsert(Collection::Plants, Record::new("a"));
        state.upsert(Collection::Plants, Record::new("b"));
        state.upsert(Collection::Plants, Record::new("a"));

        let ids: Vec<_> = state.plants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn state_serializes_with_camel_case_keys() {
        let mut state = StoreState::default();
        state.upsert(Collection::FertilizerMixes, Record::new("m1"));

        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("fertilizerMixes").is_some());
        assert!(json.get("fertilizer_mixes").is_none());
    }
}
