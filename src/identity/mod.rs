//! Central identity and session management for the Atrium portal core.
//! Keep the public surface thin and split implementation across sub-modules.

mod authorizer;
mod permission;
mod principal;
mod provider;
mod session;
mod timer;

pub use authorizer::PermissionEvaluator;
pub use permission::{Permission, PermissionSet, WILDCARD};
pub use principal::{Role, User};
pub use provider::{AuthProvider, DirectoryAuthProvider, LoginRequest};
pub use session::{Session, SessionStore, SharedSessionStore};
pub use timer::SessionTimer;
