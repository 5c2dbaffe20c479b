//! The single live session and its store.
//!
//! One `Session` exists per store at a time; the store is the only place it is
//! held and every mutation happens under one write lock, so readers never see
//! a partially applied transition. Mutating methods are `pub(crate)`: only the
//! auth provider and the session timer write, everything else reads or
//! subscribes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::tprintln;

use super::principal::{Role, User};

/// Live authentication state. `user` is `None` exactly when the portal is
/// unauthenticated; in that state the timestamps are absent and the countdown
/// sits at zero. Serde-enabled so a consumer that wants reload persistence has
/// a canonical schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub login_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub remaining_secs: u64,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tick {
    /// No session; nothing to count down.
    Idle,
    /// Session still live with this many seconds left.
    Running(u64),
    /// Countdown hit zero; the session was cleared in the same critical section.
    Expired,
    /// The caller's session has been replaced; the tick was ignored.
    Stale,
}

pub type SharedSessionStore = Arc<SessionStore>;

// Session plus the generation it belongs to, kept under one lock so a tick
// can check and mutate atomically.
struct Slot {
    session: Session,
    generation: u64,
}

/// Single-slot holder of the current `Session`, with change notification.
/// Construct one per process (or per test) and share it via `Arc`.
///
/// Every `establish` bumps a generation counter; ticks carry the generation
/// they were armed for, so a countdown task that outlives its session by an
/// instant cannot touch the replacement.
pub struct SessionStore {
    inner: RwLock<Slot>,
    tx: watch::Sender<Session>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let initial = Session::default();
        let (tx, _rx) = watch::channel(initial.clone());
        Self {
            inner: RwLock::new(Slot { session: initial, generation: 0 }),
            tx,
        }
    }

    pub fn new_shared() -> SharedSessionStore {
        Arc::new(Self::new())
    }

    /// Clone of the current session. Cheap enough for per-render reads.
    pub fn snapshot(&self) -> Session {
        self.inner.read().session.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.read().session.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().session.is_authenticated()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.inner.read().session.remaining_secs
    }

    /// Receiver that yields a fresh snapshot after every session change.
    /// Dependent UI re-renders off this channel.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Install a freshly authenticated session at full lifetime. Returns the
    /// new session's generation for the timer to arm against.
    pub(crate) fn establish(&self, user: User, lifetime_secs: u64) -> u64 {
        let now = Utc::now();
        let next = Session {
            user: Some(user),
            login_at: Some(now),
            last_activity_at: Some(now),
            remaining_secs: lifetime_secs,
        };
        let mut guard = self.inner.write();
        guard.generation += 1;
        let generation = guard.generation;
        guard.session = next.clone();
        drop(guard);
        tprintln!("session.establish lifetime={}s gen={}", lifetime_secs, generation);
        let _ = self.tx.send(next);
        generation
    }

    /// Drop back to the unauthenticated state. Idempotent.
    pub(crate) fn clear(&self) {
        let next = Session::default();
        let mut guard = self.inner.write();
        guard.session = next.clone();
        drop(guard);
        let _ = self.tx.send(next);
    }

    /// Activity reset: re-arm the countdown to full lifetime and stamp the
    /// activity time. No-op while unauthenticated.
    pub(crate) fn touch(&self, lifetime_secs: u64) {
        let mut guard = self.inner.write();
        if guard.session.user.is_none() {
            return;
        }
        guard.session.remaining_secs = lifetime_secs;
        guard.session.last_activity_at = Some(Utc::now());
        let snap = guard.session.clone();
        drop(guard);
        let _ = self.tx.send(snap);
    }

    /// One countdown step for the session of `expected_generation`. A caller
    /// armed for an earlier session gets `Stale` and nothing changes. Expiry
    /// clears the session under the same write lock so no reader can observe
    /// `remaining_secs == 0` with a user still set.
    pub(crate) fn tick(&self, expected_generation: u64) -> Tick {
        let mut guard = self.inner.write();
        if guard.generation != expected_generation {
            tprintln!("session.tick stale gen={} current={}", expected_generation, guard.generation);
            return Tick::Stale;
        }
        if guard.session.user.is_none() {
            return Tick::Idle;
        }
        guard.session.remaining_secs = guard.session.remaining_secs.saturating_sub(1);
        let out = if guard.session.remaining_secs == 0 {
            guard.session = Session::default();
            Tick::Expired
        } else {
            Tick::Running(guard.session.remaining_secs)
        };
        let snap = guard.session.clone();
        drop(guard);
        let _ = self.tx.send(snap);
        out
    }
}
