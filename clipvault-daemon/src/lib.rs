//! Clipvault Daemon Library
//!
//! This library exposes the daemon's internal modules for integration testing.

pub mod cleanup;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod daemon;
pub mod db;
pub mod ipc;
pub mod keyvault;
pub mod monitor;
pub mod paths;
pub mod wiper;

#[cfg(test)]
pub mod testing;
