//! The encrypted backup file container.
//!
//! ## Envelope Format
//!
//! ```text
//! | magic (4) | version (2) | salt (16) | nonce (12) | ciphertext || tag (16) |
//! ```
//!
//! The magic bytes make encrypted files detectable regardless of their
//! extension. Everything after the salt is the AEAD output of
//! [`crate::crypto::CryptoManager::encrypt`] over the plain JSON
//! document.

use crate::crypto::{CryptoManager, EncryptionKey, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
use crate::error::{EngineError, EngineResult};

/// Magic bytes identifying an encrypted Growpanion backup.
const ENVELOPE_MAGIC: [u8; 4] = *b"GPBK";
/// Current envelope format version.
const ENVELOPE_VERSION: u16 = 1;
/// Header size (magic + version + salt).
const HEADER_SIZE: usize = 4 + 2 + SALT_SIZE;

/// Returns true if the content carries the encrypted envelope signature.
///
/// This is a signature probe only; it says nothing about whether the
/// envelope will decrypt successfully.
#[must_use]
pub fn is_envelope(content: &[u8]) -> bool {
    content.len() >= HEADER_SIZE && content[0..4] == ENVELOPE_MAGIC
}

/// Encrypts a plaintext document into an envelope with the given password.
///
/// A fresh salt is generated per call, so sealing the same document
/// twice never produces the same bytes.
///
/// # Errors
///
/// Returns an error if encryption fails.
pub fn seal(plaintext: &[u8], password: &str) -> EngineResult<Vec<u8>> {
    let salt = EncryptionKey::generate_salt();
    let key = EncryptionKey::derive_from_password(password, &salt)?;
    let payload = CryptoManager::new(&key).encrypt(plaintext)?;

    let mut data = Vec::with_capacity(HEADER_SIZE + payload.len());
    data.extend_from_slice(&ENVELOPE_MAGIC);
    data.extend_from_slice(&ENVELOPE_VERSION.to_le_bytes());
    data.extend_from_slice(&salt);
    data.extend(payload);

    Ok(data)
}

/// Decrypts an envelope back into the plaintext document.
///
/// # Errors
///
/// - [`EngineError::MalformedPayload`] if the content is not a valid
///   envelope or claims an unknown envelope version
/// - [`EngineError::DecryptionFailed`] on a wrong password or tampered
///   ciphertext (indistinguishable by design)
pub fn open(content: &[u8], password: &str) -> EngineResult<Vec<u8>> {
    if content.len() < HEADER_SIZE + NONCE_SIZE + TAG_SIZE {
        return Err(EngineError::malformed_payload("encrypted file too small"));
    }
    if content[0..4] != ENVELOPE_MAGIC {
        return Err(EngineError::malformed_payload("invalid envelope magic"));
    }

    let version = u16::from_le_bytes([content[4], content[5]]);
    if version != ENVELOPE_VERSION {
        return Err(EngineError::malformed_payload(format!(
            "unsupported envelope version: {version}"
        )));
    }

    let salt = &content[6..HEADER_SIZE];
    let key = EncryptionKey::derive_from_password(password, salt)?;
    CryptoManager::new(&key).decrypt(&content[HEADER_SIZE..])
}
