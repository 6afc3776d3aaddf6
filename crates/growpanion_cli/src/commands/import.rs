//! Import command.

use growpanion_core::{import_data, parse_import_file, ImportStrategy};
use growpanion_store::FileStore;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Import a backup file into the store.
///
/// Parses and validates the file, then applies it under the chosen
/// strategy. The import either commits in full or leaves the store
/// untouched; the exit status follows `ImportResult::success`.
pub fn run(
    store_path: &Path,
    input: &Path,
    strategy: ImportStrategy,
    password: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("importing {:?} with strategy {}", input, strategy.name());

    let content = fs::read(input)?;
    let parsed = parse_import_file(&content, password)?;

    let store = FileStore::open(store_path)?;

    let mut on_progress = |percent: u8, message: &str| {
        print!("\r[{percent:>3}%] {message:<40}");
        let _ = std::io::stdout().flush();
    };
    let result = import_data(&store, &parsed.snapshot, strategy, Some(&mut on_progress));
    println!();

    if !result.success {
        return Err(format!("import failed: {}", result.errors.join("; ")).into());
    }

    println!("✓ Import complete ({} strategy)", strategy.name());
    println!(
        "  Imported: {} grows, {} plants, {} mixes, settings: {}",
        result.imported.grows,
        result.imported.plants,
        result.imported.fertilizer_mixes,
        result.imported.settings
    );
    println!(
        "  Skipped:  {} grows, {} plants, {} mixes",
        result.skipped.grows, result.skipped.plants, result.skipped.fertilizer_mixes
    );

    Ok(())
}
