//! Route guard: role-gated rendering with redirect-with-memory.
//!
//! The guard never throws for an expected condition. Unauthenticated callers
//! are sent to the login surface with the destination they wanted carried as
//! an explicit value; wrong-role callers are sent to their own home, never to
//! the content they asked for.

use serde::{Deserialize, Serialize};

use crate::identity::{Role, Session};

/// Path of the login surface.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Session exists and its role matches; render the destination.
    Allow,
    /// No session: go to login, remembering where the caller was headed.
    ToLogin { intended: String },
    /// Wrong role: go to that role's own home destination.
    ToHome { destination: String },
}

impl GuardOutcome {
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Result of the wrapping form: either the rendered value or the redirect the
/// caller must perform instead.
#[derive(Debug)]
pub enum Guarded<T> {
    Rendered(T),
    Redirect(GuardOutcome),
}

/// Decide whether `session` may render `destination`, which requires `required`.
/// Exact role match; permissions play no part at the route level.
pub fn guard(required: Role, destination: &str, session: &Session) -> GuardOutcome {
    match session.role() {
        None => GuardOutcome::ToLogin { intended: destination.to_string() },
        Some(role) if role == required => GuardOutcome::Allow,
        Some(role) => GuardOutcome::ToHome { destination: role.home_path().to_string() },
    }
}

/// Wrapping form used at each protected screen: renders only on `Allow`.
pub fn guard_render<T, F: FnOnce() -> T>(
    required: Role,
    destination: &str,
    session: &Session,
    render: F,
) -> Guarded<T> {
    match guard(required, destination, session) {
        GuardOutcome::Allow => Guarded::Rendered(render()),
        redirect => Guarded::Redirect(redirect),
    }
}

/// Where to land after a successful login: the remembered destination when one
/// was captured, otherwise the role's home. The guard at the destination still
/// runs, so an intended path the new role cannot reach bounces to home there.
pub fn after_login(intended: Option<&str>, session: &Session) -> String {
    let Some(role) = session.role() else { return LOGIN_PATH.to_string(); };
    match intended {
        Some(dest) if !dest.is_empty() => dest.to_string(),
        _ => role.home_path().to_string(),
    }
}
