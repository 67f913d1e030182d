//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Get default data directory help text for current platform
fn default_dir_help() -> String {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    return "Data directory (default: ~/.clipvault)".to_string();

    #[cfg(target_os = "windows")]
    return "Data directory (default: %USERPROFILE%\\.clipvault)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Data directory (overrides platform default)".to_string();
}

/// Clipvault Daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Data directory (overrides platform default)
    #[arg(short, long, help = default_dir_help())]
    pub dir: Option<PathBuf>,

    /// Enable debug logging (shows client connect/disconnect and command messages)
    #[arg(long, default_value = "false")]
    pub debug: bool,
}
