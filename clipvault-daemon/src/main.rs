//! Clipvault Daemon

mod args;
mod cleanup;
mod clipboard;
mod config;
mod constants;
mod crypto;
mod daemon;
mod db;
mod ipc;
mod keyvault;
mod monitor;
mod paths;
#[cfg(test)]
mod testing;
mod wiper;

use std::sync::Arc;

use clap::Parser;

use args::Args;
use clipboard::SystemClipboard;
use constants::*;
use daemon::Daemon;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Print banner first
    println!("{}{}", MSG_BANNER, env!("CARGO_PKG_VERSION"));

    // Determine data directory (use provided path or platform default)
    let data_dir = match args.dir {
        Some(dir) => dir,
        None => match paths::default_data_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{}{}", ERR_GENERIC, e);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = paths::init_data_dir(&data_dir) {
        eprintln!("{}{}", ERR_GENERIC, e);
        std::process::exit(1);
    }
    println!("{}{}", MSG_DATA_DIR, data_dir.display());

    // The encryption key lives in the OS keychain, never in the data dir
    let key = match keyvault::get_or_create_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{}{}", ERR_KEY_INIT, e);
            std::process::exit(1);
        }
    };

    let clipboard = Arc::new(SystemClipboard);
    let daemon = match Daemon::start(&data_dir, key, clipboard, args.debug).await {
        Ok(daemon) => daemon,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    daemon.run().await;

    println!("{}", MSG_SHUTDOWN_COMPLETE);
}
