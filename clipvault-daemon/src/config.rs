//! Config file persistence
//!
//! The config lives as pretty-printed JSON in the data directory. Loading is
//! forgiving: a missing file is created with defaults, and an unreadable or
//! malformed file is reset to defaults so the daemon always starts with a
//! valid file on disk.

use std::fmt;
use std::fs;
use std::path::Path;

use clipvault_common::config::VaultConfig;

use crate::constants::{ERR_CONFIG_LOAD, MSG_CONFIG_CREATED};

/// Errors that can occur while persisting the config
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    Io(String),
    /// Config could not be serialized
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config I/O error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "config serialize error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load the config from disk, creating it with defaults on first run
///
/// Values are sanitized after load so a hand-edited file can't set a zero
/// wipe delay or poll interval. An unreadable or malformed file is logged
/// and rewritten with defaults.
///
/// # Errors
///
/// Returns an error only when the default config cannot be written, on
/// first run or while replacing a broken file.
pub fn load_or_create(path: &Path) -> Result<VaultConfig, ConfigError> {
    if !path.exists() {
        let config = VaultConfig::default();
        save(path, &config)?;
        println!("{}{}", MSG_CONFIG_CREATED, path.display());
        return Ok(config);
    }

    let mut config = match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<VaultConfig>(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}{}", ERR_CONFIG_LOAD, e);
                reset_to_defaults(path)?
            }
        },
        Err(e) => {
            eprintln!("{}{}", ERR_CONFIG_LOAD, e);
            reset_to_defaults(path)?
        }
    };

    config.sanitize();
    Ok(config)
}

/// Replace a broken config file with defaults
fn reset_to_defaults(path: &Path) -> Result<VaultConfig, ConfigError> {
    let config = VaultConfig::default();
    save(path, &config)?;
    Ok(config)
}

/// Write the config to disk as pretty-printed JSON
pub fn save(path: &Path, config: &VaultConfig) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Serialize(e.to_string()))?;
    fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;
    Ok(())
}
