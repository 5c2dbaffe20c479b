//! Portal facade: wires the directory, session store, timer, evaluator and
//! access gate behind the surface every UI component consumes.
//!
//! One `Portal` owns one process-wide session; tests construct isolated
//! portals freely, each with its own store.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;

use crate::access::{self, GuardOutcome, Guarded, NavigationItem};
use crate::config::PortalConfig;
use crate::directory::Directory;
use crate::error::AppResult;
use crate::identity::{
    AuthProvider, DirectoryAuthProvider, LoginRequest, PermissionEvaluator, Role, Session,
    SessionStore, SessionTimer, SharedSessionStore, User,
};

pub struct Portal {
    store: SharedSessionStore,
    timer: Arc<SessionTimer>,
    provider: DirectoryAuthProvider,
    evaluator: PermissionEvaluator,
    navigation: Vec<NavigationItem>,
}

impl Portal {
    /// Build a portal over an account directory. The navigation tree is
    /// validated here so a misconfigured item fails startup, not first render.
    pub fn new(
        config: &PortalConfig,
        directory: Arc<Directory>,
        navigation: Vec<NavigationItem>,
    ) -> AppResult<Self> {
        access::validate_tree(&navigation)?;
        let store = SessionStore::new_shared();
        let timer = SessionTimer::new(store.clone(), config.lifetime_secs(), config.tick);
        let provider = DirectoryAuthProvider::new(
            directory,
            store.clone(),
            timer.clone(),
            config.lifetime_secs(),
        );
        let evaluator = PermissionEvaluator::new(store.clone());
        Ok(Self { store, timer, provider, evaluator, navigation })
    }

    // --- credential lifecycle ---

    /// See [`AuthProvider::login`]: `Ok(false)` is wrong credentials, `Err`
    /// directory failure.
    pub fn login(&self, req: &LoginRequest) -> Result<bool> {
        self.provider.login(req)
    }

    pub fn logout(&self) {
        self.provider.logout();
    }

    /// Hook for click/keypress listeners; re-arms the idle countdown.
    pub fn update_activity(&self) {
        self.timer.update_activity();
    }

    // --- session introspection surface ---

    pub fn current_user(&self) -> Option<User> {
        self.store.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.store.remaining_secs()
    }

    pub fn has_permission(&self, capability: &str) -> bool {
        self.evaluator.has_permission(capability)
    }

    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.subscribe()
    }

    // --- access gate ---

    pub fn guard(&self, required: Role, destination: &str) -> GuardOutcome {
        access::guard(required, destination, &self.store.snapshot())
    }

    pub fn guard_render<T, F: FnOnce() -> T>(
        &self,
        required: Role,
        destination: &str,
        render: F,
    ) -> Guarded<T> {
        access::guard_render(required, destination, &self.store.snapshot(), render)
    }

    pub fn after_login(&self, intended: Option<&str>) -> String {
        access::after_login(intended, &self.store.snapshot())
    }

    pub fn filter_navigation(&self) -> Vec<NavigationItem> {
        access::filter_navigation(&self.navigation, &self.store.snapshot(), &self.evaluator)
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        self.timer.stop();
    }
}

/// The portal's standard sidebar tree: one subtree per role, admin entries
/// additionally permission-gated.
pub fn default_navigation() -> Vec<NavigationItem> {
    use crate::identity::Role::*;
    vec![
        NavigationItem::leaf("student-dashboard", "Dashboard", "/student/dashboard", &[Student]),
        NavigationItem::leaf("student-courses", "My Courses", "/student/courses", &[Student])
            .with_permission("view_courses"),
        NavigationItem::leaf("student-grades", "Grades", "/student/grades", &[Student])
            .with_permission("view_grades"),
        NavigationItem::leaf("student-fees", "Fees", "/student/fees", &[Student])
            .with_permission("pay_fees"),
        NavigationItem::leaf("instructor-dashboard", "Dashboard", "/instructor/dashboard", &[Instructor]),
        NavigationItem::leaf("instructor-grading", "Grading", "/instructor/grading", &[Instructor])
            .with_permission("grade_students"),
        NavigationItem::leaf("instructor-attendance", "Attendance", "/instructor/attendance", &[Instructor])
            .with_permission("manage_attendance"),
        NavigationItem::leaf("admin-dashboard", "Dashboard", "/admin/dashboard", &[Admin]),
        NavigationItem {
            id: "admin-manage".into(),
            label: "Administration".into(),
            path: None,
            roles: vec![Admin],
            required_permission: None,
            children: vec![
                NavigationItem::leaf("admin-users", "Users", "/admin/users", &[Admin])
                    .with_permission("manage_users"),
                NavigationItem::leaf("admin-reports", "Reports", "/admin/reports", &[Admin])
                    .with_permission("view_reports"),
            ],
        },
    ]
}
