//! The export snapshot and its wire shape.

use growpanion_store::{Record, Settings};
use serde::{Deserialize, Serialize};

/// Version tag of the export format this engine emits and accepts.
pub const SCHEMA_VERSION: &str = "1.0";

/// A complete point-in-time copy of the application state.
///
/// This is the unit of export and import. The struct mirrors the file
/// layout exactly (a `metadata` object and a `data` object), so plain
/// exports are just the pretty-printed serialization of a `Snapshot`.
///
/// A snapshot is created fresh on every export and discarded after an
/// import transaction completes; it is never persisted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format and provenance information.
    pub metadata: SnapshotMetadata,
    /// The four exported collections.
    pub data: SnapshotData,
}

/// Format and provenance information for a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Export format version. This engine only emits and accepts
    /// [`SCHEMA_VERSION`].
    pub version: String,
    /// Version of the producing application. Informational only,
    /// never validated.
    #[serde(default)]
    pub app_version: String,
    /// ISO-8601 timestamp of the export. Informational only.
    #[serde(default)]
    pub exported_at: String,
    /// Whether the payload the user received was encrypted.
    ///
    /// Set by the codec: recorded at creation on export, and on import
    /// overwritten with what detection actually found, independent of
    /// what the file claims about itself.
    #[serde(default)]
    pub encrypted: bool,
    /// Optional free-text label for the export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The exported collections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    /// Grow entities.
    pub grows: Vec<Record>,
    /// Plant entities.
    pub plants: Vec<Record>,
    /// Fertilizer mix entities.
    pub fertilizer_mixes: Vec<Record>,
    /// The settings record, or `None` if the store had none.
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// Read-only projection of a snapshot for display.
///
/// This is what the UI shows before the user confirms an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    /// Number of grow entities.
    pub grows: usize,
    /// Number of plant entities.
    pub plants: usize,
    /// Number of fertilizer mix entities.
    pub fertilizer_mixes: usize,
    /// Whether the snapshot carries a settings record.
    pub has_settings: bool,
    /// When the snapshot was exported.
    pub export_date: String,
    /// Export format version.
    pub version: String,
}

impl Snapshot {
    /// Returns the display summary of this snapshot.
    #[must_use]
    pub fn summary(&self) -> ExportSummary {
        ExportSummary {
            grows: self.data.grows.len(),
            plants: self.data.plants.len(),
            fertilizer_mixes: self.data.fertilizer_mixes.len(),
            has_settings: self.data.settings.is_some(),
            export_date: self.metadata.exported_at.clone(),
            version: self.metadata.version.clone(),
        }
    }
}
