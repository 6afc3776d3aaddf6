//! Inspect command.

use growpanion_core::{detect_file_type, parse_import_file, FileKind};
use std::fs;
use std::path::Path;

/// Show what a backup file contains without importing it.
pub fn run(input: &Path, password: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read(input)?;

    let filename = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let kind = detect_file_type(filename, &content);

    println!("File: {:?}", input);
    println!(
        "Type: {}",
        match kind {
            FileKind::Encrypted => "encrypted backup",
            FileKind::Plain => "plain backup",
            FileKind::Unknown => "unknown",
        }
    );

    if kind == FileKind::Unknown {
        return Err("not a recognizable Growpanion backup".into());
    }

    let parsed = parse_import_file(&content, password)?;
    let summary = parsed.snapshot.summary();

    println!("Version: {}", summary.version);
    println!("Exported: {}", summary.export_date);
    if let Some(description) = &parsed.snapshot.metadata.description {
        println!("Description: {description}");
    }
    println!(
        "Contents: {} grows, {} plants, {} mixes, settings: {}",
        summary.grows, summary.plants, summary.fertilizer_mixes, summary.has_settings
    );

    Ok(())
}
