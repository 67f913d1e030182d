//! Data directory resolution and preparation

use std::path::{Path, PathBuf};

use clipvault_common::{CONFIG_FILE_NAME, DATA_DIR_NAME, DB_FILE_NAME, SOCKET_FILE_NAME};

const ERR_NO_HOME: &str = "could not determine home directory";
const ERR_CREATE_DATA_DIR: &str = "could not create data directory ";

/// Get the default data directory for the platform
///
/// Returns `~/.clipvault` (`%USERPROFILE%\.clipvault` on Windows).
///
/// # Errors
///
/// Returns an error if the platform's home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| ERR_NO_HOME.to_string())?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Create the data directory if it doesn't exist
///
/// Uses `create_dir_all()` for idempotent creation. On Unix the directory
/// is restricted to the owner (0o700) since it holds the database and socket.
///
/// # Errors
///
/// Returns an error if directory creation or permission setting fails.
pub fn init_data_dir(dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("{}{}: {}", ERR_CREATE_DATA_DIR, dir.display(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = std::fs::metadata(dir).map_err(|e| e.to_string())?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o700);
        std::fs::set_permissions(dir, permissions).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Set secure file permissions (0o600 - owner read/write only)
#[cfg(unix)]
pub fn set_secure_permissions(path: &Path) -> Result<(), String> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(|e| e.to_string())?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(0o600);
    std::fs::set_permissions(path, permissions).map_err(|e| e.to_string())
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

pub fn db_path(dir: &Path) -> PathBuf {
    dir.join(DB_FILE_NAME)
}

pub fn socket_path(dir: &Path) -> PathBuf {
    dir.join(SOCKET_FILE_NAME)
}
