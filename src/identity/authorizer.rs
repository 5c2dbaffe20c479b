//! Capability decisions against the current session.

use super::session::SharedSessionStore;

/// Answers "may the current user do X" from live session state. Stateless:
/// every call re-reads the store, so a forced logout is visible on the very
/// next check with no special error path.
pub struct PermissionEvaluator {
    store: SharedSessionStore,
}

impl PermissionEvaluator {
    pub fn new(store: SharedSessionStore) -> Self {
        Self { store }
    }

    /// False with no session; otherwise an exact-or-wildcard set lookup on the
    /// user's permissions. Role alone grants nothing here.
    pub fn has_permission(&self, capability: &str) -> bool {
        match self.store.current_user() {
            Some(user) => user.permissions.grants(capability),
            None => false,
        }
    }
}
