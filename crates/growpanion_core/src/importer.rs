//! Applying a snapshot to the store under a conflict strategy.
//!
//! The entire import - the optional clear, then grows, plants,
//! fertilizer mixes, and settings, in that fixed order - runs inside
//! one store transaction. If any step fails, the transaction rolls
//! back and the store is left exactly as it was. Partial imports are
//! never acceptable.

use crate::snapshot::Snapshot;
use growpanion_store::{Collection, Record, Settings, Store, StoreResult, StoreTransaction};
use tracing::{info, warn};

/// How incoming entities interact with existing store entities that
/// share an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStrategy {
    /// Clear all collections first, then write everything from the
    /// snapshot unconditionally.
    Replace,
    /// Overwrite existing entities with the snapshot's version, insert
    /// the rest. Settings merge field-by-field with a sensor union.
    Merge,
    /// Leave existing entities untouched, insert only unknown ids.
    Skip,
}

impl ImportStrategy {
    /// Returns the strategy's lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ImportStrategy::Replace => "replace",
            ImportStrategy::Merge => "merge",
            ImportStrategy::Skip => "skip",
        }
    }
}

impl std::str::FromStr for ImportStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(ImportStrategy::Replace),
            "merge" => Ok(ImportStrategy::Merge),
            "skip" => Ok(ImportStrategy::Skip),
            other => Err(format!("unknown import strategy: {other}")),
        }
    }
}

/// Per-collection counts of entities written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    /// Grow entities written.
    pub grows: usize,
    /// Plant entities written.
    pub plants: usize,
    /// Fertilizer mix entities written.
    pub fertilizer_mixes: usize,
    /// Whether the settings record was written.
    pub settings: bool,
}

/// Per-collection counts of entities left untouched under `skip`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkippedCounts {
    /// Grow entities skipped.
    pub grows: usize,
    /// Plant entities skipped.
    pub plants: usize,
    /// Fertilizer mix entities skipped.
    pub fertilizer_mixes: usize,
}

/// Outcome of an import.
///
/// `success == false` means the transaction was aborted and rolled
/// back; `errors` then carries the failure message and all counts are
/// zero, since nothing was committed.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Whether the transaction committed.
    pub success: bool,
    /// Entities written, per collection.
    pub imported: ImportCounts,
    /// Entities left untouched, per collection.
    pub skipped: SkippedCounts,
    /// Failure messages; empty on success.
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
struct Tally {
    imported: ImportCounts,
    skipped: SkippedCounts,
}

/// Applies snapshots to a store under a conflict strategy.
///
/// # Example
///
/// ```rust,ignore
/// let importer = Importer::new(ImportStrategy::Merge);
/// let result = importer.import(&store, &snapshot);
/// assert!(result.success);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Importer {
    strategy: ImportStrategy,
}

impl Importer {
    /// Creates an importer with the given strategy.
    #[must_use]
    pub fn new(strategy: ImportStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the configured strategy.
    #[must_use]
    pub fn strategy(&self) -> ImportStrategy {
        self.strategy
    }

    /// Imports a snapshot without progress reporting.
    ///
    /// Expected failures never escape as errors; callers check
    /// [`ImportResult::success`].
    pub fn import<S: Store + ?Sized>(&self, store: &S, snapshot: &Snapshot) -> ImportResult {
        self.import_with_progress(store, snapshot, |_, _| {})
    }

    /// Imports a snapshot, reporting progress along the way.
    ///
    /// `progress` receives a monotonically non-decreasing percentage
    /// and a short message: once per phase boundary and once per
    /// processed entity. It is best-effort UI feedback only and has no
    /// bearing on the transaction.
    pub fn import_with_progress<S, F>(
        &self,
        store: &S,
        snapshot: &Snapshot,
        mut progress: F,
    ) -> ImportResult
    where
        S: Store + ?Sized,
        F: FnMut(u8, &str),
    {
        info!(strategy = self.strategy.name(), "starting import");
        progress(0, "Starting import");

        let strategy = self.strategy;
        let mut tally = Tally::default();

        let outcome = store.with_transaction(&mut |txn| {
            if strategy == ImportStrategy::Replace {
                progress(2, "Clearing existing data");
                for collection in Collection::ALL {
                    txn.clear(collection)?;
                }
                txn.clear_settings()?;
            }

            import_collection(
                txn,
                strategy,
                Collection::Grows,
                &snapshot.data.grows,
                (5, 40),
                &mut tally,
                &mut progress,
            )?;
            import_collection(
                txn,
                strategy,
                Collection::Plants,
                &snapshot.data.plants,
                (40, 70),
                &mut tally,
                &mut progress,
            )?;
            import_collection(
                txn,
                strategy,
                Collection::FertilizerMixes,
                &snapshot.data.fertilizer_mixes,
                (70, 90),
                &mut tally,
                &mut progress,
            )?;

            progress(95, "Importing settings");
            if let Some(incoming) = &snapshot.data.settings {
                tally.imported.settings = import_settings(txn, strategy, incoming)?;
            }

            Ok(())
        });

        match outcome {
            Ok(()) => {
                progress(100, "Import complete");
                info!(
                    grows = tally.imported.grows,
                    plants = tally.imported.plants,
                    fertilizer_mixes = tally.imported.fertilizer_mixes,
                    "import committed"
                );
                ImportResult {
                    success: true,
                    imported: tally.imported,
                    skipped: tally.skipped,
                    errors: Vec::new(),
                }
            }
            Err(e) => {
                warn!(error = %e, "import rolled back");
                // Nothing was committed, so counts report zero rather
                // than the progress made before the abort.
                ImportResult {
                    success: false,
                    imported: ImportCounts::default(),
                    skipped: SkippedCounts::default(),
                    errors: vec![e.to_string()],
                }
            }
        }
    }
}

fn import_collection<F: FnMut(u8, &str)>(
    txn: &mut dyn StoreTransaction,
    strategy: ImportStrategy,
    collection: Collection,
    entities: &[Record],
    (from, to): (u8, u8),
    tally: &mut Tally,
    progress: &mut F,
) -> StoreResult<()> {
    progress(from, &format!("Importing {collection}"));

    let total = entities.len();
    for (index, entity) in entities.iter().enumerate() {
        let written = match strategy {
            ImportStrategy::Replace | ImportStrategy::Merge => {
                txn.put(collection, entity.clone())?;
                true
            }
            ImportStrategy::Skip => {
                if txn.get(collection, &entity.id)?.is_some() {
                    false
                } else {
                    txn.put(collection, entity.clone())?;
                    true
                }
            }
        };

        let (imported, skipped) = match collection {
            Collection::Grows => (&mut tally.imported.grows, &mut tally.skipped.grows),
            Collection::Plants => (&mut tally.imported.plants, &mut tally.skipped.plants),
            Collection::FertilizerMixes => (
                &mut tally.imported.fertilizer_mixes,
                &mut tally.skipped.fertilizer_mixes,
            ),
        };
        if written {
            *imported += 1;
        } else {
            *skipped += 1;
        }

        let span = u8::try_from((to - from) as usize * (index + 1) / total).unwrap_or(0);
        progress(
            from + span,
            &format!("Importing {collection} ({}/{total})", index + 1),
        );
    }

    Ok(())
}

fn import_settings(
    txn: &mut dyn StoreTransaction,
    strategy: ImportStrategy,
    incoming: &Settings,
) -> StoreResult<bool> {
    match strategy {
        // Settings were cleared along with everything else.
        ImportStrategy::Replace => {
            txn.put_settings(incoming.clone())?;
            Ok(true)
        }
        ImportStrategy::Merge => {
            let merged = match txn.settings()? {
                Some(existing) => merge_settings(existing, incoming.clone()),
                None => incoming.clone(),
            };
            txn.put_settings(merged)?;
            Ok(true)
        }
        // Only written when no settings exist at all; an existing
        // record counts as neither imported nor skipped.
        ImportStrategy::Skip => {
            if txn.settings()?.is_none() {
                txn.put_settings(incoming.clone())?;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }
}

/// Shallow-merges incoming settings onto existing ones.
///
/// Incoming fields overwrite existing fields unconditionally, except
/// the sensor list: existing sensors are kept, and incoming sensors
/// are appended only when their id does not already appear.
fn merge_settings(existing: Settings, incoming: Settings) -> Settings {
    let mut fields = existing.fields;
    for (key, value) in incoming.fields {
        fields.insert(key, value);
    }

    let mut sensors = existing.sensors;
    for sensor in incoming.sensors {
        if !sensors.iter().any(|s| s.id == sensor.id) {
            sensors.push(sensor);
        }
    }

    Settings { sensors, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotData, SnapshotMetadata, SCHEMA_VERSION};
    use growpanion_store::{MemoryStore, StoreState};

    fn snapshot_with(data: SnapshotData) -> Snapshot {
        Snapshot {
            metadata: SnapshotMetadata {
                version: SCHEMA_VERSION.to_string(),
                app_version: "1.0.0".to_string(),
                exported_at: "2026-08-30T12:00:00+00:00".to_string(),
                encrypted: false,
                description: None,
            },
            data,
        }
    }

    fn seeded_store() -> MemoryStore {
        MemoryStore::with_state(StoreState {
            grows: vec![Record::new("existing-grow").with_field("name", "old tent")],
            plants: vec![Record::new("shared").with_field("strain", "store version")],
            fertilizer_mixes: Vec::new(),
            settings: Some(
                Settings::new()
                    .with_field("theme", "dark")
                    .with_sensor(Record::new("a"))
                    .with_sensor(Record::new("b")),
            ),
        })
    }

    #[test]
    fn replace_is_destructive_and_total() {
        let store = seeded_store();
        let snapshot = snapshot_with(SnapshotData {
            grows: vec![Record::new("g1")],
            plants: Vec::new(),
            fertilizer_mixes: Vec::new(),
            settings: None,
        });

        let result = Importer::new(ImportStrategy::Replace).import(&store, &snapshot);

        assert!(result.success);
        assert_eq!(result.imported.grows, 1);
        assert_eq!(result.skipped, SkippedCounts::default());

        let state = store.snapshot_state();
        assert_eq!(state.grows.len(), 1);
        assert_eq!(state.grows[0].id, "g1");
        assert!(state.plants.is_empty());
        assert!(state.settings.is_none());
    }

    #[test]
    fn merge_keeps_unrelated_and_overwrites_shared() {
        let store = seeded_store();
        let snapshot = snapshot_with(SnapshotData {
            grows: Vec::new(),
            plants: vec![
                Record::new("shared").with_field("strain", "snapshot version"),
                Record::new("new-plant"),
            ],
            fertilizer_mixes: Vec::new(),
            settings: None,
        });

        let result = Importer::new(ImportStrategy::Merge).import(&store, &snapshot);

        assert!(result.success);
        assert_eq!(result.imported.plants, 2);

        let state = store.snapshot_state();
        // Unrelated entity untouched.
        assert_eq!(state.grows.len(), 1);
        assert_eq!(state.grows[0].id, "existing-grow");
        // Shared id overwritten with the snapshot's version.
        let shared = state.find(Collection::Plants, "shared").unwrap();
        assert_eq!(shared.fields["strain"], "snapshot version");
        assert!(state.find(Collection::Plants, "new-plant").is_some());
    }

    #[test]
    fn skip_never_overwrites() {
        let store = seeded_store();
        let snapshot = snapshot_with(SnapshotData {
            grows: Vec::new(),
            plants: vec![
                Record::new("shared").with_field("strain", "snapshot version"),
                Record::new("new-plant"),
            ],
            fertilizer_mixes: Vec::new(),
            settings: None,
        });

        let result = Importer::new(ImportStrategy::Skip).import(&store, &snapshot);

        assert!(result.success);
        assert_eq!(result.imported.plants, 1);
        assert_eq!(result.skipped.plants, 1);

        let shared = store.get(Collection::Plants, "shared").unwrap().unwrap();
        assert_eq!(shared.fields["strain"], "store version");
    }

    #[test]
    fn merge_settings_unions_sensors() {
        let store = seeded_store();
        let snapshot = snapshot_with(SnapshotData {
            grows: Vec::new(),
            plants: Vec::new(),
            fertilizer_mixes: Vec::new(),
            settings: Some(
                Settings::new()
                    .with_field("theme", "light")
                    .with_sensor(Record::new("b").with_field("origin", "incoming"))
                    .with_sensor(Record::new("c")),
            ),
        });

        let result = Importer::new(ImportStrategy::Merge).import(&store, &snapshot);
        assert!(result.success);
        assert!(result.imported.settings);

        let settings = store.settings().unwrap().unwrap();
        // Incoming fields overwrite.
        assert_eq!(settings.fields["theme"], "light");
        // Sensor union: existing kept, incoming duplicate dropped.
        let ids: Vec<_> = settings.sensors.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(settings.sensors[1].fields.get("origin").is_none());
    }

    #[test]
    fn skip_leaves_existing_settings_uncounted() {
        let store = seeded_store();
        let snapshot = snapshot_with(SnapshotData {
            grows: Vec::new(),
            plants: Vec::new(),
            fertilizer_mixes: Vec::new(),
            settings: Some(Settings::new().with_field("theme", "light")),
        });

        let result = Importer::new(ImportStrategy::Skip).import(&store, &snapshot);

        assert!(result.success);
        assert!(!result.imported.settings);
        assert_eq!(
            store.settings().unwrap().unwrap().fields["theme"],
            "dark"
        );
    }

    #[test]
    fn skip_writes_settings_when_none_exist() {
        let store = MemoryStore::new();
        let snapshot = snapshot_with(SnapshotData {
            grows: Vec::new(),
            plants: Vec::new(),
            fertilizer_mixes: Vec::new(),
            settings: Some(Settings::new().with_field("theme", "light")),
        });

        let result = Importer::new(ImportStrategy::Skip).import(&store, &snapshot);

        assert!(result.success);
        assert!(result.imported.settings);
        assert!(store.settings().unwrap().is_some());
    }

    #[test]
    fn progress_is_monotone_and_reaches_completion() {
        let store = MemoryStore::new();
        let snapshot = snapshot_with(SnapshotData {
            grows: (0..10).map(|i| Record::new(format!("g{i}"))).collect(),
            plants: (0..5).map(|i| Record::new(format!("p{i}"))).collect(),
            fertilizer_mixes: vec![Record::new("m1")],
            settings: Some(Settings::new()),
        });

        let mut reports: Vec<u8> = Vec::new();
        let result = Importer::new(ImportStrategy::Merge).import_with_progress(
            &store,
            &snapshot,
            |percent, _| reports.push(percent),
        );

        assert!(result.success);
        assert!(reports.windows(2).all(|w| w[0] <= w[1]), "{reports:?}");
        assert_eq!(reports.first(), Some(&0));
        assert_eq!(reports.last(), Some(&100));
        // At least one report per entity plus the phase boundaries.
        assert!(reports.len() >= 16 + 5);
    }

    #[test]
    fn duplicate_ids_within_batch_are_last_write_wins() {
        let store = MemoryStore::new();
        let snapshot = snapshot_with(SnapshotData {
            grows: vec![
                Record::new("dup").with_field("round", 1),
                Record::new("dup").with_field("round", 2),
            ],
            plants: Vec::new(),
            fertilizer_mixes: Vec::new(),
            settings: None,
        });

        let result = Importer::new(ImportStrategy::Merge).import(&store, &snapshot);
        assert!(result.success);

        let grows = store.to_array(Collection::Grows).unwrap();
        assert_eq!(grows.len(), 1);
        assert_eq!(grows[0].fields["round"], 2);
    }
}
