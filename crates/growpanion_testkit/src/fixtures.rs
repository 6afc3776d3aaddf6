//! Canned data for tests.

use growpanion_core::{Snapshot, SnapshotData, SnapshotMetadata, SCHEMA_VERSION};
use growpanion_store::{MemoryStore, Record, Settings, StoreState};

/// A store state with one entity per collection and settings with two
/// sensors.
#[must_use]
pub fn seeded_state() -> StoreState {
    StoreState {
        grows: vec![Record::new("grow-spring").with_field("name", "Spring tent")],
        plants: vec![Record::new("plant-nl").with_field("strain", "Northern Lights")],
        fertilizer_mixes: vec![Record::new("mix-veg").with_field("npk", "3-1-2")],
        settings: Some(
            Settings::new()
                .with_field("theme", "dark")
                .with_field("tdsUnit", "ppm")
                .with_sensor(Record::new("sensor-a"))
                .with_sensor(Record::new("sensor-b")),
        ),
    }
}

/// A memory store pre-populated with [`seeded_state`].
#[must_use]
pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_state(seeded_state())
}

/// Snapshot data with the given number of generated grows and plants.
#[must_use]
pub fn sample_snapshot_data(grows: usize, plants: usize) -> SnapshotData {
    SnapshotData {
        grows: (0..grows)
            .map(|i| Record::new(format!("grow-{i}")).with_field("index", i))
            .collect(),
        plants: (0..plants)
            .map(|i| Record::new(format!("plant-{i}")).with_field("index", i))
            .collect(),
        fertilizer_mixes: Vec::new(),
        settings: Some(Settings::new().with_field("theme", "light")),
    }
}

/// A complete snapshot with generated entities and fixed metadata.
#[must_use]
pub fn sample_snapshot(grows: usize, plants: usize) -> Snapshot {
    Snapshot {
        metadata: SnapshotMetadata {
            version: SCHEMA_VERSION.to_string(),
            app_version: "1.0.0".to_string(),
            exported_at: "2026-08-30T12:00:00+00:00".to_string(),
            encrypted: false,
            description: Some("fixture".to_string()),
        },
        data: sample_snapshot_data(grows, plants),
    }
}
