//! Periodic history retention sweeps
//!
//! Prunes by age first, then by count, once a minute. The first sweep runs
//! immediately at start so a daemon restarted after a long absence trims
//! right away rather than a minute later.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::constants::{CLEANUP_INTERVAL, ERR_CLEANUP, MSG_CLEANUP_PRUNED};
use crate::db::EntryDb;

/// Retention limits used by each sweep
#[derive(Debug, Clone, Copy)]
struct Limits {
    max_age_days: u32,
    max_entries: u32,
}

/// Runs the retention sweeps on a timer
pub struct CleanupScheduler {
    limits: Arc<Mutex<Limits>>,
    task: Option<JoinHandle<()>>,
}

impl CleanupScheduler {
    /// Spawn the sweep task
    pub fn start(entries: EntryDb, max_age_days: u32, max_entries: u32) -> Self {
        let limits = Arc::new(Mutex::new(Limits {
            max_age_days,
            max_entries,
        }));

        let shared = Arc::clone(&limits);
        let task = tokio::spawn(async move {
            loop {
                let limits = *shared.lock().unwrap();
                sweep(&entries, limits).await;
                tokio::time::sleep(CLEANUP_INTERVAL).await;
            }
        });

        Self {
            limits,
            task: Some(task),
        }
    }

    /// Swap the retention limits used by later sweeps
    pub fn update_config(&self, max_age_days: u32, max_entries: u32) {
        *self.limits.lock().unwrap() = Limits {
            max_age_days,
            max_entries,
        };
    }

    /// Abort the sweep task
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// One retention pass: age first, then count
///
/// Store errors are reported and swallowed; the next sweep retries.
async fn sweep(entries: &EntryDb, limits: Limits) {
    let aged = match entries.prune_by_age(limits.max_age_days).await {
        Ok(removed) => removed,
        Err(e) => {
            eprintln!("{}{}", ERR_CLEANUP, e);
            return;
        }
    };

    let counted = match entries.prune_by_count(limits.max_entries).await {
        Ok(removed) => removed,
        Err(e) => {
            eprintln!("{}{}", ERR_CLEANUP, e);
            return;
        }
    };

    if aged > 0 || counted > 0 {
        println!("{}{} by age, {} by count", MSG_CLEANUP_PRUNED, aged, counted);
    }
}
