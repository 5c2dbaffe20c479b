use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::directory::{Account, Directory};

use super::permission::PermissionSet;
use super::principal::User;
use super::session::SharedSessionStore;
use super::timer::SessionTimer;

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Accepted from the login form but deliberately without effect: the
    /// source portal renders the checkbox and never varies session lifetime
    /// or persistence on it.
    pub remember_me: bool,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> Self {
        Self { email: email.to_string(), password: password.to_string(), remember_me: false }
    }
}

/// Seam for credential validation. The portal ships the directory-backed
/// implementation; tests or a future backend integration provide their own.
pub trait AuthProvider: Send + Sync {
    /// `Ok(true)` establishes a session; `Ok(false)` is wrong credentials with
    /// the session untouched. `Err` is reserved for directory failures.
    fn login(&self, req: &LoginRequest) -> Result<bool>;

    /// Tear down the current session. Idempotent.
    fn logout(&self);
}

pub struct DirectoryAuthProvider {
    directory: Arc<Directory>,
    store: SharedSessionStore,
    timer: Arc<SessionTimer>,
    lifetime_secs: u64,
    // Serializes login attempts so a second call can never race the first
    // into the store.
    login_gate: Mutex<()>,
}

impl DirectoryAuthProvider {
    pub fn new(
        directory: Arc<Directory>,
        store: SharedSessionStore,
        timer: Arc<SessionTimer>,
        lifetime_secs: u64,
    ) -> Self {
        Self { directory, store, timer, lifetime_secs, login_gate: Mutex::new(()) }
    }

    fn user_from_account(acct: &Account) -> User {
        User {
            id: Uuid::new_v4(),
            display_name: acct.display_name.clone(),
            email: acct.email.clone(),
            role: acct.role,
            student_id: acct.student_id.clone(),
            employee_id: acct.employee_id.clone(),
            permissions: PermissionSet::from_names(&acct.permissions),
            mfa_enabled: acct.mfa_enabled,
            last_login: Utc::now(),
        }
    }
}

impl AuthProvider for DirectoryAuthProvider {
    fn login(&self, req: &LoginRequest) -> Result<bool> {
        let _gate = self.login_gate.lock();
        let Some(acct) = self.directory.authenticate(&req.email, &req.password)? else {
            // Expected outcome, not a fault; the caller shows "invalid credentials"
            info!(target: "atrium::auth", "login rejected email={}", req.email);
            return Ok(false);
        };
        let user = Self::user_from_account(&acct);
        info!(target: "atrium::auth", "login user={} role={}", user.email, user.role);
        // Stop the old countdown before the new session lands; the generation
        // handed to the new timer makes any still-in-flight old tick a no-op.
        self.timer.stop();
        let generation = self.store.establish(user, self.lifetime_secs);
        self.timer.start(generation);
        Ok(true)
    }

    fn logout(&self) {
        self.timer.stop();
        if self.store.is_authenticated() {
            info!(target: "atrium::auth", "logout");
        } else {
            debug!(target: "atrium::auth", "logout with no active session (no-op)");
        }
        self.store.clear();
    }
}
