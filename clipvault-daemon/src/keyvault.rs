//! Encryption key storage in the system keychain
//!
//! The 256-bit vault key lives in the platform keychain (Keychain on macOS,
//! Secret Service on Linux, Credential Manager on Windows) as a 64-character
//! hex string. It is generated once on first run; losing it makes every
//! stored entry unreadable, so a corrupt value is an error rather than a
//! trigger to regenerate.

use chacha20poly1305::aead::{OsRng, rand_core::RngCore};
use keyring::Entry;

use crate::constants::{KEYCHAIN_ACCOUNT, KEYCHAIN_SERVICE, MSG_KEY_CREATED};

/// Errors that can occur while obtaining the vault key
#[derive(Debug)]
pub enum KeyVaultError {
    /// Keychain could not be accessed
    Keychain(String),
    /// Stored value is not a 64-character hex key
    InvalidStoredKey,
}

impl std::fmt::Display for KeyVaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyVaultError::Keychain(msg) => write!(f, "keychain error: {}", msg),
            KeyVaultError::InvalidStoredKey => {
                write!(f, "stored key is corrupt (expected 64 hex characters)")
            }
        }
    }
}

impl std::error::Error for KeyVaultError {}

/// Fetch the vault key from the keychain, generating one on first run
pub fn get_or_create_key() -> Result<[u8; 32], KeyVaultError> {
    let entry = Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT)
        .map_err(|e| KeyVaultError::Keychain(e.to_string()))?;

    match entry.get_password() {
        Ok(stored) => parse_key_hex(&stored),
        Err(keyring::Error::NoEntry) => {
            let mut key = [0u8; 32];
            OsRng.fill_bytes(&mut key);

            entry
                .set_password(&hex::encode(key))
                .map_err(|e| KeyVaultError::Keychain(e.to_string()))?;
            println!("{}", MSG_KEY_CREATED);

            Ok(key)
        }
        Err(e) => Err(KeyVaultError::Keychain(e.to_string())),
    }
}

/// Parse a stored hex key, rejecting anything that isn't exactly 32 bytes
fn parse_key_hex(stored: &str) -> Result<[u8; 32], KeyVaultError> {
    let bytes = hex::decode(stored).map_err(|_| KeyVaultError::InvalidStoredKey)?;
    bytes.try_into().map_err(|_| KeyVaultError::InvalidStoredKey)
}
