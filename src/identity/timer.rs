//! Idle-countdown timer for the active session.
//!
//! One spawned task per active session decrements the store's countdown once
//! per tick; expiry is the store clearing itself mid-tick, after which the
//! task exits on its own. `start` always cancels the previous handle first,
//! so two timers can never run against one store, and `stop` is safe to call
//! in any state. Each task carries the generation of the session it was
//! armed for; abort lands at the next await point, so a tick already past
//! its sleep when a re-login replaces the session reaches the store — and
//! gets ignored there as stale.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::session::{SharedSessionStore, Tick};

pub struct SessionTimer {
    store: SharedSessionStore,
    lifetime_secs: u64,
    tick: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SessionTimer {
    pub fn new(store: SharedSessionStore, lifetime_secs: u64, tick: Duration) -> Arc<Self> {
        Arc::new(Self { store, lifetime_secs, tick, handle: Mutex::new(None) })
    }

    /// Begin (or restart) the countdown for the session of `generation`.
    pub fn start(&self, generation: u64) {
        let mut slot = self.handle.lock();
        if let Some(prev) = slot.take() {
            // A login over a live session replaces its timer, never doubles it
            prev.abort();
        }
        let store = self.store.clone();
        let tick = self.tick;
        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // First tick of tokio's interval fires immediately; consume it so
            // the countdown starts a full period after login.
            interval.tick().await;
            loop {
                interval.tick().await;
                match store.tick(generation) {
                    Tick::Running(left) => {
                        debug!(target: "atrium::session", "tick: {}s remaining", left);
                    }
                    Tick::Expired => {
                        info!(target: "atrium::session", "session expired, forced logout applied");
                        break;
                    }
                    Tick::Stale => {
                        debug!(target: "atrium::session", "countdown outlived its session, exiting");
                        break;
                    }
                    Tick::Idle => break,
                }
            }
        }));
    }

    /// Cancel the countdown task if one is running. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    /// User interaction: re-arm the countdown to the full lifetime. Harmless
    /// while unauthenticated, idempotent under bursts of events.
    pub fn update_activity(&self) {
        self.store.touch(self.lifetime_secs);
    }

}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}
