//! Serialization of snapshots to and from backup files.
//!
//! Plain backups are pretty-printed UTF-8 JSON, openable in any text
//! editor. Password-protected backups wrap the same JSON document in
//! the AEAD envelope of [`crate::envelope`]. File type detection is
//! extension-independent: content inspection wins whenever the
//! extension lies.

use crate::envelope;
use crate::error::{EngineError, EngineResult};
use crate::schema::validate_export_schema;
use crate::snapshot::{Snapshot, SCHEMA_VERSION};
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Extension of plain backup files.
pub const PLAIN_EXTENSION: &str = "json";
/// Extension of encrypted backup files.
pub const ENCRYPTED_EXTENSION: &str = "growpanion";

const FILENAME_PREFIX: &str = "growpanion-backup";

/// Detected kind of a backup file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// An encrypted envelope.
    Encrypted,
    /// A plain JSON document.
    Plain,
    /// Neither an envelope nor parseable JSON.
    Unknown,
}

/// An export ready to hand to the host's file-save primitive.
#[derive(Debug, Clone)]
pub struct EncodedExport {
    /// The file bytes.
    pub content: Vec<u8>,
    /// Suggested filename, `growpanion-backup-<date>.<ext>`.
    pub filename: String,
    /// Whether `content` is an encrypted envelope.
    pub encrypted: bool,
}

/// A successfully decoded and validated import file.
#[derive(Debug, Clone)]
pub struct DecodedImport {
    /// The validated snapshot.
    pub snapshot: Snapshot,
    /// Whether the file was actually encrypted, as detected by the
    /// codec rather than claimed by the payload.
    pub was_encrypted: bool,
}

/// Serializes a snapshot into a distributable backup file.
///
/// Without a password the output is the pretty-printed JSON document.
/// With a password the document is sealed into the encrypted envelope.
/// The password is never stored or logged.
///
/// # Errors
///
/// Returns an error if serialization or encryption fails.
pub fn encode(snapshot: &Snapshot, password: Option<&str>) -> EngineResult<EncodedExport> {
    let encrypted = password.is_some();

    let mut snapshot = snapshot.clone();
    snapshot.metadata.encrypted = encrypted;

    let json = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| EngineError::malformed_payload(format!("serialize snapshot: {e}")))?;

    let content = match password {
        Some(password) => envelope::seal(&json, password)?,
        None => json,
    };

    debug!(encrypted, size = content.len(), "encoded export file");

    Ok(EncodedExport {
        content,
        filename: suggested_filename(encrypted),
        encrypted,
    })
}

/// Parses and validates a backup file into a snapshot.
///
/// The pipeline is: envelope detection, optional decryption, JSON
/// parse, shape validation, version gate, typed deserialization. The
/// returned snapshot's `encrypted` flag reflects what was actually
/// detected, not what the payload claims about itself.
///
/// # Errors
///
/// - [`EngineError::PasswordRequired`] for an envelope without a password
/// - [`EngineError::DecryptionFailed`] on wrong password or tampering
/// - [`EngineError::MalformedPayload`] when the plaintext is not JSON
/// - [`EngineError::SchemaInvalid`] listing every shape violation
/// - [`EngineError::UnsupportedVersion`] for format versions other
///   than [`SCHEMA_VERSION`]
pub fn decode(content: &[u8], password: Option<&str>) -> EngineResult<DecodedImport> {
    let (plaintext, was_encrypted) = if envelope::is_envelope(content) {
        let password = password.ok_or(EngineError::PasswordRequired)?;
        (envelope::open(content, password)?, true)
    } else {
        (content.to_vec(), false)
    };

    let raw: Value = serde_json::from_slice(&plaintext)
        .map_err(|e| EngineError::malformed_payload(e.to_string()))?;

    let report = validate_export_schema(&raw);
    if !report.valid {
        return Err(EngineError::schema_invalid(report.errors));
    }

    // Schema validation guarantees metadata.version is a string.
    let version = raw["metadata"]["version"].as_str().unwrap_or_default();
    if version != SCHEMA_VERSION {
        return Err(EngineError::unsupported_version(version));
    }

    let mut snapshot: Snapshot = serde_json::from_value(raw)
        .map_err(|e| EngineError::malformed_payload(e.to_string()))?;

    // The engine trusts its own detection over the payload's
    // self-description for this one flag.
    snapshot.metadata.encrypted = was_encrypted;

    debug!(
        was_encrypted,
        grows = snapshot.data.grows.len(),
        plants = snapshot.data.plants.len(),
        "decoded import file"
    );

    Ok(DecodedImport {
        snapshot,
        was_encrypted,
    })
}

/// Detects whether a file is an encrypted or plain backup.
///
/// The filename extension is consulted first; when the content
/// contradicts it (e.g. an encrypted file renamed to `.json`), content
/// inspection wins. Content that is neither an envelope nor parseable
/// JSON is [`FileKind::Unknown`] regardless of extension.
#[must_use]
pub fn detect(filename: &str, content: &[u8]) -> FileKind {
    let by_extension = match Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case(ENCRYPTED_EXTENSION) => Some(FileKind::Encrypted),
        Some(ext) if ext.eq_ignore_ascii_case(PLAIN_EXTENSION) => Some(FileKind::Plain),
        _ => None,
    };

    let by_content = if envelope::is_envelope(content) {
        Some(FileKind::Encrypted)
    } else if serde_json::from_slice::<Value>(content).is_ok_and(|v| v.is_object()) {
        Some(FileKind::Plain)
    } else {
        None
    };

    match (by_extension, by_content) {
        (Some(ext), Some(content_kind)) if ext != content_kind => {
            warn!(filename, ?ext, ?content_kind, "file extension contradicts content");
            content_kind
        }
        (_, Some(content_kind)) => content_kind,
        (_, None) => FileKind::Unknown,
    }
}

fn suggested_filename(encrypted: bool) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    let ext = if encrypted {
        ENCRYPTED_EXTENSION
    } else {
        PLAIN_EXTENSION
    };
    format!("{FILENAME_PREFIX}-{date}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotData, SnapshotMetadata};
    use growpanion_store::{Record, Settings};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            metadata: SnapshotMetadata {
                version: SCHEMA_VERSION.to_string(),
                app_version: "1.0.0".to_string(),
                exported_at: "2026-08-30T12:00:00+00:00".to_string(),
                encrypted: false,
                description: Some("pre-migration".to_string()),
            },
            data: SnapshotData {
                grows: vec![Record::new("g1").with_field("name", "tent")],
                plants: vec![Record::new("p1"), Record::new("p2")],
                fertilizer_mixes: Vec::new(),
                settings: Some(Settings::new().with_sensor(Record::new("s1"))),
            },
        }
    }

    #[test]
    fn plain_roundtrip_preserves_data() {
        let snapshot = sample_snapshot();
        let export = encode(&snapshot, None).unwrap();

        assert!(!export.encrypted);
        assert!(export.filename.starts_with("growpanion-backup-"));
        assert!(export.filename.ends_with(".json"));

        let decoded = decode(&export.content, None).unwrap();
        assert!(!decoded.was_encrypted);
        assert_eq!(decoded.snapshot.data, snapshot.data);
        assert_eq!(
            decoded.snapshot.metadata.description,
            snapshot.metadata.description
        );
    }

    #[test]
    fn encrypted_roundtrip_preserves_data() {
        let snapshot = sample_snapshot();
        let export = encode(&snapshot, Some("hunter2")).unwrap();

        assert!(export.encrypted);
        assert!(export.filename.ends_with(".growpanion"));

        let decoded = decode(&export.content, Some("hunter2")).unwrap();
        assert!(decoded.was_encrypted);
        assert!(decoded.snapshot.metadata.encrypted);
        assert_eq!(decoded.snapshot.data, snapshot.data);
    }

    #[test]
    fn encrypted_without_password_needs_password() {
        let export = encode(&sample_snapshot(), Some("pw")).unwrap();

        let err = decode(&export.content, None).unwrap_err();
        assert!(matches!(err, EngineError::PasswordRequired));
        assert_eq!(err.code(), "ENCRYPTED_FILE_NEEDS_PASSWORD");
    }

    #[test]
    fn wrong_password_fails_closed() {
        let export = encode(&sample_snapshot(), Some("right")).unwrap();

        assert!(matches!(
            decode(&export.content, Some("wrong")),
            Err(EngineError::DecryptionFailed)
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = decode(b"{ not json", None).unwrap_err();
        assert!(matches!(err, EngineError::MalformedPayload { .. }));
        assert_eq!(err.code(), "INVALID_JSON");
    }

    #[test]
    fn schema_violations_rejected_with_details() {
        let err = decode(b"{\"metadata\":{\"version\":\"1.0\"}}", None).unwrap_err();
        match err {
            EngineError::SchemaInvalid { violations } => {
                assert_eq!(violations, ["missing data section"]);
            }
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn unknown_version_rejected() {
        let content = b"{\"metadata\":{\"version\":\"2.0\"},\"data\":{\"grows\":[],\"plants\":[],\"fertilizerMixes\":[]}}";

        assert!(matches!(
            decode(content, None),
            Err(EngineError::UnsupportedVersion { version }) if version == "2.0"
        ));
    }

    #[test]
    fn detection_trusts_its_own_eyes_over_payload_claims() {
        // A plaintext file whose metadata falsely claims it was encrypted.
        let mut snapshot = sample_snapshot();
        snapshot.metadata.encrypted = true;
        let json = serde_json::to_vec(&snapshot).unwrap();

        let decoded = decode(&json, None).unwrap();
        assert!(!decoded.was_encrypted);
        assert!(!decoded.snapshot.metadata.encrypted);
    }

    #[test]
    fn detect_is_extension_independent() {
        let export = encode(&sample_snapshot(), Some("pw")).unwrap();

        // Renamed to the plain extension, content still wins.
        assert_eq!(detect("backup.json", &export.content), FileKind::Encrypted);
        assert_eq!(
            detect("backup.growpanion", &export.content),
            FileKind::Encrypted
        );
        assert_eq!(detect("no-extension", &export.content), FileKind::Encrypted);
    }

    #[test]
    fn detect_plain_and_unknown() {
        let plain = encode(&sample_snapshot(), None).unwrap();

        assert_eq!(detect("backup.json", &plain.content), FileKind::Plain);
        assert_eq!(detect("backup.growpanion", &plain.content), FileKind::Plain);
        assert_eq!(detect("backup.json", b"garbage"), FileKind::Unknown);
        assert_eq!(detect("backup.growpanion", b""), FileKind::Unknown);
    }
}
