//! # Growpanion Core
//!
//! Backup engine for the Growpanion cultivation tracker.
//!
//! This crate provides:
//! - Collector: reads the full application state into a [`Snapshot`]
//! - Codec: serializes snapshots to backup files, optionally sealed
//!   with password-based AES-256-GCM, and detects file kinds
//! - Importer: applies a snapshot to the store under one of three
//!   conflict strategies inside a single atomic transaction
//!
//! ## Usage
//!
//! ```rust
//! use growpanion_core::{
//!     collect_export_data, create_export_file, import_data, parse_import_file,
//!     ImportStrategy,
//! };
//! use growpanion_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//!
//! // Export, password-protected.
//! let export = create_export_file(&store, Some("hunter2"), Some("weekly")).unwrap();
//!
//! // Import it back under the merge strategy.
//! let parsed = parse_import_file(&export.content, Some("hunter2")).unwrap();
//! let result = import_data(&store, &parsed.snapshot, ImportStrategy::Merge, None);
//! assert!(result.success);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod collector;
mod crypto;
mod envelope;
mod error;
mod importer;
mod schema;
mod snapshot;

pub use codec::{
    decode, detect, encode, DecodedImport, EncodedExport, FileKind, ENCRYPTED_EXTENSION,
    PLAIN_EXTENSION,
};
pub use collector::collect;
pub use crypto::{CryptoManager, EncryptionKey, KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
pub use error::{EngineError, EngineResult};
pub use importer::{ImportCounts, ImportResult, ImportStrategy, Importer, SkippedCounts};
pub use schema::{validate_export_schema, SchemaReport};
pub use snapshot::{
    ExportSummary, Snapshot, SnapshotData, SnapshotMetadata, SCHEMA_VERSION,
};

use growpanion_store::Store;

/// Reads the current store state into a fresh snapshot.
///
/// # Errors
///
/// Fails as a whole if any store read fails.
pub fn collect_export_data<S: Store + ?Sized>(
    store: &S,
    description: Option<&str>,
) -> EngineResult<Snapshot> {
    collector::collect(store, description)
}

/// Collects the current state and encodes it into a backup file.
///
/// With a password the file is an encrypted envelope; without, plain
/// JSON. The returned filename follows
/// `growpanion-backup-<date>.<ext>`.
///
/// # Errors
///
/// Fails if collection, serialization, or encryption fails.
pub fn create_export_file<S: Store + ?Sized>(
    store: &S,
    password: Option<&str>,
    description: Option<&str>,
) -> EngineResult<EncodedExport> {
    let snapshot = collector::collect(store, description)?;
    codec::encode(&snapshot, password)
}

/// Parses and validates a backup file into a snapshot.
///
/// # Errors
///
/// See [`decode`] for the failure taxonomy.
pub fn parse_import_file(content: &[u8], password: Option<&str>) -> EngineResult<DecodedImport> {
    codec::decode(content, password)
}

/// Applies a snapshot to the store under the given strategy.
///
/// Expected failures are reported through [`ImportResult`], never
/// returned as errors: the transaction either commits in full or rolls
/// back in full.
pub fn import_data<S: Store + ?Sized>(
    store: &S,
    snapshot: &Snapshot,
    strategy: ImportStrategy,
    on_progress: Option<&mut dyn FnMut(u8, &str)>,
) -> ImportResult {
    let importer = Importer::new(strategy);
    match on_progress {
        Some(progress) => importer.import_with_progress(store, snapshot, progress),
        None => importer.import(store, snapshot),
    }
}

/// Detects whether a file is an encrypted or plain backup.
#[must_use]
pub fn detect_file_type(filename: &str, content: &[u8]) -> FileKind {
    codec::detect(filename, content)
}

/// Returns the display summary of a snapshot.
#[must_use]
pub fn get_export_summary(snapshot: &Snapshot) -> ExportSummary {
    snapshot.summary()
}
