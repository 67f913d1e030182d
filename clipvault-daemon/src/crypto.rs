//! Cryptographic operations for clipboard history at rest
//!
//! Uses ChaCha20-Poly1305 with a 256-bit key held in the system keychain.
//! Every entry is encrypted with a fresh random nonce; ciphertext and nonce
//! are stored in separate database columns.

use chacha20poly1305::{
    ChaCha20Poly1305, KeyInit, Nonce,
    aead::{Aead, OsRng, rand_core::RngCore},
};

/// Nonce size for ChaCha20-Poly1305 (96 bits / 12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Handles encryption and decryption of clipboard entries
pub struct ClipCrypto {
    cipher: ChaCha20Poly1305,
}

impl ClipCrypto {
    /// Create a new crypto instance from a 256-bit key
    pub fn new(key: &[u8; 32]) -> Self {
        let cipher = ChaCha20Poly1305::new(key.into());
        Self { cipher }
    }

    /// Encrypt clipboard text
    ///
    /// Returns `(ciphertext, nonce)`. The nonce is random per call, so
    /// encrypting the same text twice yields different ciphertexts.
    pub fn encrypt(&self, plaintext: &str) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;

        Ok((ciphertext, nonce_bytes.to_vec()))
    }

    /// Decrypt a stored entry back to clipboard text
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<String, CryptoError> {
        if nonce.len() != NONCE_SIZE {
            return Err(CryptoError::InvalidData);
        }

        let nonce = Nonce::from_slice(nonce);
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
    }
}

/// Errors that can occur during cryptographic operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed (should not happen with valid input)
    EncryptionFailed,
    /// Decryption failed (wrong key, corrupted data, or tampered ciphertext)
    DecryptionFailed,
    /// Stored nonce has the wrong length
    InvalidData,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoError::EncryptionFailed => write!(f, "encryption failed"),
            CryptoError::DecryptionFailed => write!(f, "decryption failed"),
            CryptoError::InvalidData => write!(f, "invalid encrypted data"),
        }
    }
}

impl std::error::Error for CryptoError {}
