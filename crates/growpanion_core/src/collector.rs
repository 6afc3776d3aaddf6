//! Reading the store into a snapshot.

use crate::error::EngineResult;
use crate::snapshot::{Snapshot, SnapshotData, SnapshotMetadata, SCHEMA_VERSION};
use chrono::Utc;
use growpanion_store::{Collection, Store};
use tracing::debug;

/// Reads the full application state into a fresh [`Snapshot`].
///
/// All four collections are read in one sequential pass with no
/// filtering. This is a user-initiated, low-frequency operation, so no
/// concurrent-writer protection is promised; callers serialize export
/// and import calls themselves.
///
/// # Errors
///
/// Fails as a whole if any underlying read fails. No partial snapshot
/// is ever returned.
pub fn collect<S: Store + ?Sized>(store: &S, description: Option<&str>) -> EngineResult<Snapshot> {
    let grows = store.to_array(Collection::Grows)?;
    let plants = store.to_array(Collection::Plants)?;
    let fertilizer_mixes = store.to_array(Collection::FertilizerMixes)?;
    let settings = store.settings()?;

    debug!(
        grows = grows.len(),
        plants = plants.len(),
        fertilizer_mixes = fertilizer_mixes.len(),
        has_settings = settings.is_some(),
        "collected export data"
    );

    Ok(Snapshot {
        metadata: SnapshotMetadata {
            version: SCHEMA_VERSION.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now().to_rfc3339(),
            encrypted: false,
            description: description.map(str::to_string),
        },
        data: SnapshotData {
            grows,
            plants,
            fertilizer_mixes,
            settings,
        },
    })
}
