//! Password-based encryption using AES-256-GCM.
//!
//! Backup files are protected with authenticated encryption: a wrong
//! password and a tampered file both fail decryption, and the two
//! causes are indistinguishable by construction.

use crate::error::{EngineError, EngineResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;
/// Size of the per-file key derivation salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Encryption key derived from the user's password.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Derives a key from a password using HKDF-SHA256.
    ///
    /// The salt is generated fresh per export and stored in the file
    /// envelope, so the same password yields a different key for every
    /// backup file.
    ///
    /// # Errors
    ///
    /// Returns an error if key expansion fails.
    pub fn derive_from_password(password: &str, salt: &[u8]) -> EngineResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(salt), password.as_bytes());

        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(b"growpanion-backup-key-v1", &mut bytes)
            .map_err(|_| EngineError::encryption_failed("HKDF expand failed"))?;

        Ok(Self { bytes })
    }

    /// Generates a fresh random salt for key derivation.
    #[must_use]
    pub fn generate_salt() -> [u8; SALT_SIZE] {
        let mut salt = [0u8; SALT_SIZE];
        rand::thread_rng().fill_bytes(&mut salt);
        salt
    }

    fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Performs encryption and decryption with a derived key.
pub struct CryptoManager {
    cipher: Aes256Gcm,
}

impl CryptoManager {
    /// Creates a crypto manager with the given key.
    #[must_use]
    pub fn new(key: &EncryptionKey) -> Self {
        // EncryptionKey.bytes is always exactly KEY_SIZE bytes, which
        // matches AES-256's key size requirement.
        let key_array = GenericArray::from_slice(key.as_bytes());
        let cipher = Aes256Gcm::new(key_array);
        Self { cipher }
    }

    /// Encrypts data using AES-256-GCM.
    ///
    /// The output format is: `nonce (12 bytes) || ciphertext || tag (16 bytes)`
    ///
    /// # Errors
    ///
    /// Returns an error if the cipher rejects the input.
    pub fn encrypt(&self, plaintext: &[u8]) -> EngineResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| EngineError::encryption_failed("encryption error"))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend(ciphertext);

        Ok(result)
    }

    /// Decrypts data that was encrypted with [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DecryptionFailed`] on a wrong password or
    /// tampered ciphertext; the engine cannot tell the two apart.
    pub fn decrypt(&self, ciphertext: &[u8]) -> EngineResult<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(EngineError::DecryptionFailed);
        }

        let nonce = Nonce::from_slice(&ciphertext[..NONCE_SIZE]);
        let encrypted = &ciphertext[NONCE_SIZE..];

        self.cipher
            .decrypt(nonce, encrypted)
            .map_err(|_| EngineError::DecryptionFailed)
    }
}

impl std::fmt::Debug for CryptoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoManager")
            .field("cipher", &"Aes256Gcm")
            .finish()
    }
}
