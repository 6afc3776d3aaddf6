//! Error types for the backup engine.

use growpanion_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during export or import.
///
/// The collector and codec surface these directly; the importer never
/// lets one escape once its transaction has started, reporting through
/// [`crate::ImportResult`] instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Content is encrypted but no password was supplied.
    #[error("file is encrypted and requires a password")]
    PasswordRequired,

    /// Decryption failed: wrong password or tampered ciphertext.
    ///
    /// Authenticated encryption cannot distinguish the two causes, so
    /// neither does this error.
    #[error("decryption failed: wrong password or corrupted file")]
    DecryptionFailed,

    /// Encryption of the export payload failed.
    #[error("encryption failed: {message}")]
    EncryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Content is not parseable as the structured export format.
    #[error("invalid backup file: {message}")]
    MalformedPayload {
        /// Description of the parse failure.
        message: String,
    },

    /// Content parsed but failed shape validation.
    #[error("invalid backup schema: {}", violations.join("; "))]
    SchemaInvalid {
        /// One entry per independent shape violation.
        violations: Vec<String>,
    },

    /// The export format version is not recognized by this engine.
    #[error("unsupported export version: {version}")]
    UnsupportedVersion {
        /// The version the file claims.
        version: String,
    },

    /// Underlying store read or write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Creates an encryption failed error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Creates a schema invalid error from a violation list.
    pub fn schema_invalid(violations: Vec<String>) -> Self {
        Self::SchemaInvalid { violations }
    }

    /// Creates an unsupported version error.
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    /// Returns the stable identifier the UI layer keys its messages on.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PasswordRequired => "ENCRYPTED_FILE_NEEDS_PASSWORD",
            Self::DecryptionFailed => "DECRYPTION_FAILED",
            Self::EncryptionFailed { .. } => "ENCRYPTION_FAILED",
            Self::MalformedPayload { .. } => "INVALID_JSON",
            Self::SchemaInvalid { .. } => "INVALID_SCHEMA",
            Self::UnsupportedVersion { .. } => "UNSUPPORTED_VERSION",
            Self::Store(_) => "STORE_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            EngineError::PasswordRequired.code(),
            "ENCRYPTED_FILE_NEEDS_PASSWORD"
        );
        assert_eq!(EngineError::DecryptionFailed.code(), "DECRYPTION_FAILED");
        assert_eq!(
            EngineError::malformed_payload("x").code(),
            "INVALID_JSON"
        );
        assert_eq!(
            EngineError::schema_invalid(vec!["missing metadata".into()]).code(),
            "INVALID_SCHEMA"
        );
    }

    #[test]
    fn schema_violations_appear_in_message() {
        let err = EngineError::schema_invalid(vec![
            "missing metadata".into(),
            "data.grows is not an array".into(),
        ]);
        let message = err.to_string();
        assert!(message.contains("missing metadata"));
        assert!(message.contains("data.grows"));
    }
}
