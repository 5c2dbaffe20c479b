//! Authentication integration tests: credential lifecycle and permission
//! evaluation through the portal surface, positive and negative paths.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use atrium::config::PortalConfig;
use atrium::directory::Directory;
use atrium::identity::{LoginRequest, Role};
use atrium::portal::{default_navigation, Portal};

fn test_config() -> PortalConfig {
    PortalConfig {
        session_lifetime: Duration::from_secs(300),
        tick: Duration::from_millis(1000),
        directory_path: None,
    }
}

fn seeded_portal() -> Portal {
    let dir = Directory::new();
    dir.seed_demo().expect("seed");
    Portal::new(&test_config(), Arc::new(dir), default_navigation()).expect("portal")
}

#[tokio::test]
async fn valid_login_establishes_full_lifetime_session() -> Result<()> {
    let portal = seeded_portal();
    assert!(!portal.is_authenticated());

    let ok = portal.login(&LoginRequest::new("student@atrium.edu", "student"))?;
    assert!(ok);
    assert!(portal.is_authenticated());
    assert_eq!(portal.remaining_seconds(), 300);

    let user = portal.current_user().expect("user present after login");
    assert_eq!(user.role, Role::Student);
    assert_eq!(user.student_id.as_deref(), Some("S-2024-0117"));
    let session = portal.session();
    assert_eq!(session.login_at, session.last_activity_at);
    Ok(())
}

#[tokio::test]
async fn invalid_credentials_leave_session_untouched() -> Result<()> {
    let portal = seeded_portal();

    // From the unauthenticated state
    assert!(!portal.login(&LoginRequest::new("student@atrium.edu", "wrong"))?);
    assert!(!portal.login(&LoginRequest::new("ghost@atrium.edu", "student"))?);
    assert!(!portal.is_authenticated());

    // From an authenticated state: the live session survives a failed attempt
    assert!(portal.login(&LoginRequest::new("student@atrium.edu", "student"))?);
    assert!(!portal.login(&LoginRequest::new("admin@atrium.edu", "wrong"))?);
    assert!(portal.is_authenticated());
    assert_eq!(portal.current_user().expect("user").role, Role::Student);
    Ok(())
}

#[tokio::test]
async fn logout_is_idempotent() -> Result<()> {
    let portal = seeded_portal();

    // No session yet: a no-op, not an error
    portal.logout();
    assert!(!portal.is_authenticated());

    assert!(portal.login(&LoginRequest::new("admin@atrium.edu", "admin"))?);
    portal.logout();
    assert!(!portal.is_authenticated());
    assert_eq!(portal.remaining_seconds(), 0);
    portal.logout();
    assert!(!portal.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn remember_me_has_no_observable_effect() -> Result<()> {
    let portal = seeded_portal();
    let mut req = LoginRequest::new("student@atrium.edu", "student");
    req.remember_me = true;
    assert!(portal.login(&req)?);
    assert_eq!(portal.remaining_seconds(), 300);
    Ok(())
}

#[tokio::test]
async fn permissions_require_a_session() -> Result<()> {
    let portal = seeded_portal();
    assert!(!portal.has_permission("view_courses"));
    assert!(!portal.has_permission("*"));

    assert!(portal.login(&LoginRequest::new("instructor@atrium.edu", "instructor"))?);
    assert!(portal.has_permission("grade_students"));
    assert!(!portal.has_permission("grade"));
    assert!(!portal.has_permission("manage_users"));

    portal.logout();
    assert!(!portal.has_permission("grade_students"));
    Ok(())
}

#[tokio::test]
async fn admin_wildcard_grants_every_capability() -> Result<()> {
    let portal = seeded_portal();
    assert!(portal.login(&LoginRequest::new("admin@atrium.edu", "admin"))?);
    for cap in ["manage_users", "view_reports", "grade_students", "made_up_capability"] {
        assert!(portal.has_permission(cap), "wildcard should grant '{}'", cap);
    }
    Ok(())
}

#[tokio::test]
async fn same_role_different_permission_sets() -> Result<()> {
    let dir = Directory::new();
    dir.add_account("a@atrium.edu", "pw", "A", Role::Instructor, None, Some("E-1"), &["grade_students"], false)?;
    dir.add_account("b@atrium.edu", "pw", "B", Role::Instructor, None, Some("E-2"), &["manage_attendance"], false)?;
    let portal = Portal::new(&test_config(), Arc::new(dir), default_navigation()).expect("portal");

    assert!(portal.login(&LoginRequest::new("a@atrium.edu", "pw"))?);
    assert!(portal.has_permission("grade_students"));
    assert!(!portal.has_permission("manage_attendance"));

    assert!(portal.login(&LoginRequest::new("b@atrium.edu", "pw"))?);
    assert!(!portal.has_permission("grade_students"));
    assert!(portal.has_permission("manage_attendance"));
    Ok(())
}

#[tokio::test]
async fn session_change_notifies_subscribers() -> Result<()> {
    let portal = seeded_portal();
    let mut rx = portal.subscribe();
    assert!(portal.login(&LoginRequest::new("student@atrium.edu", "student"))?);
    rx.changed().await?;
    assert!(rx.borrow_and_update().is_authenticated());
    portal.logout();
    rx.changed().await?;
    assert!(!rx.borrow_and_update().is_authenticated());
    Ok(())
}
