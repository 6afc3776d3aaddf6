//! Export command.

use growpanion_core::{collect_export_data, encode};
use growpanion_store::FileStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Export the store to a backup file.
///
/// Collects the full store state, encodes it (encrypting when a
/// password is given), and writes it to `output` or to the suggested
/// `growpanion-backup-<date>.<ext>` filename in the current directory.
pub fn run(
    store_path: &Path,
    output: Option<&Path>,
    password: Option<&str>,
    description: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("exporting store {:?}", store_path);

    let store = FileStore::open(store_path)?;
    let snapshot = collect_export_data(&store, description)?;
    let summary = snapshot.summary();
    let export = encode(&snapshot, password)?;

    let output =
        output.map_or_else(|| Path::new(&export.filename).to_path_buf(), Path::to_path_buf);
    fs::write(&output, &export.content)?;

    println!("✓ Backup created successfully");
    println!("  Path: {:?}", output);
    println!("  Size: {} bytes", export.content.len());
    println!("  Encrypted: {}", export.encrypted);
    println!(
        "  Contents: {} grows, {} plants, {} mixes, settings: {}",
        summary.grows, summary.plants, summary.fertilizer_mixes, summary.has_settings
    );

    Ok(())
}
