//! Access gate: the route guard and the navigation filter, two consumers of
//! the same role/permission decision.

mod guard;
mod navigation;

pub use guard::{after_login, guard, guard_render, GuardOutcome, Guarded, LOGIN_PATH};
pub use navigation::{filter_navigation, validate_tree, NavigationItem};
