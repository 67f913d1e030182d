//! Auto-wipe countdown state machine
//!
//! Every clipboard capture or restore arms a countdown; when it reaches zero
//! the daemon clears the clipboard. Ticks and the final wipe arrive on the
//! daemon's event channel, each tick carrying the state snapshot taken at
//! emit time.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::constants::COUNTDOWN_TICK;
use crate::daemon::DaemonEvent;

/// Countdown snapshot shared with clients
///
/// `countdown` is the remaining whole seconds, None while inactive.
/// `paused` is only ever true while a countdown is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WiperState {
    pub countdown: Option<u64>,
    pub paused: bool,
}

struct Inner {
    countdown: Option<u64>,
    paused: bool,
    delay: u64,
}

impl Inner {
    fn snapshot(&self) -> WiperState {
        WiperState {
            countdown: self.countdown,
            paused: self.paused,
        }
    }
}

/// Drives the auto-wipe countdown
pub struct Wiper {
    inner: Arc<Mutex<Inner>>,
    timer: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<DaemonEvent>,
}

impl Wiper {
    pub fn new(delay: u64, tx: mpsc::UnboundedSender<DaemonEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                countdown: None,
                paused: false,
                delay,
            })),
            timer: None,
            tx,
        }
    }

    /// Arm (or re-arm) the countdown at the configured delay
    ///
    /// Any running countdown is cancelled first. Emits an immediate tick so
    /// clients see the full delay right away, then decrements once per
    /// second until the wipe fires.
    pub fn start_countdown(&mut self) {
        self.stop_countdown();

        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            inner.countdown = Some(inner.delay);
            inner.paused = false;
            inner.snapshot()
        };
        let _ = self.tx.send(DaemonEvent::WiperTick(snapshot));

        let inner = Arc::clone(&self.inner);
        let tx = self.tx.clone();
        self.timer = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(COUNTDOWN_TICK).await;

                // Decrement under the lock, emit after releasing it
                let snapshot = {
                    let mut inner = inner.lock().unwrap();
                    match inner.countdown {
                        None => return,
                        Some(_) if inner.paused => continue,
                        Some(remaining) => {
                            inner.countdown = Some(remaining.saturating_sub(1));
                            inner.snapshot()
                        }
                    }
                };
                let _ = tx.send(DaemonEvent::WiperTick(snapshot));

                if snapshot.countdown == Some(0) {
                    let mut inner = inner.lock().unwrap();
                    inner.countdown = None;
                    inner.paused = false;
                    drop(inner);

                    let _ = tx.send(DaemonEvent::WipeFired);
                    return;
                }
            }
        }));
    }

    /// Cancel the countdown without firing the wipe
    pub fn stop_countdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let mut inner = self.inner.lock().unwrap();
        inner.countdown = None;
        inner.paused = false;
    }

    /// Freeze the countdown; no-op while inactive
    pub fn pause(&self) {
        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            if inner.countdown.is_none() {
                return;
            }
            inner.paused = true;
            inner.snapshot()
        };
        let _ = self.tx.send(DaemonEvent::WiperTick(snapshot));
    }

    /// Continue a paused countdown; no-op while inactive
    pub fn resume(&self) {
        let snapshot = {
            let mut inner = self.inner.lock().unwrap();
            if inner.countdown.is_none() {
                return;
            }
            inner.paused = false;
            inner.snapshot()
        };
        let _ = self.tx.send(DaemonEvent::WiperTick(snapshot));
    }

    /// Current countdown snapshot
    pub fn state(&self) -> WiperState {
        self.inner.lock().unwrap().snapshot()
    }

    /// Change the delay used by future countdowns
    ///
    /// A countdown already running keeps its original schedule.
    pub fn update_delay(&self, delay: u64) {
        self.inner.lock().unwrap().delay = delay;
    }
}
