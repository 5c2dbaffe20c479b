//! Session timer integration tests: countdown decay, activity re-arming,
//! forced logout on expiry and deterministic cancellation.
//!
//! Ticks are shortened well below one second so the suite runs fast; the
//! countdown semantics are tick-count based and independent of tick length.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

use atrium::config::PortalConfig;
use atrium::directory::Directory;
use atrium::identity::LoginRequest;
use atrium::portal::{default_navigation, Portal};

fn fast_portal(lifetime_secs: u64, tick_ms: u64) -> Portal {
    let dir = Directory::new();
    dir.seed_demo().expect("seed");
    let cfg = PortalConfig {
        session_lifetime: Duration::from_secs(lifetime_secs),
        tick: Duration::from_millis(tick_ms),
        directory_path: None,
    };
    Portal::new(&cfg, Arc::new(dir), default_navigation()).expect("portal")
}

async fn login_student(portal: &Portal) {
    let ok = portal
        .login(&LoginRequest::new("student@atrium.edu", "student"))
        .expect("directory available");
    assert!(ok);
}

#[tokio::test]
async fn countdown_decreases_while_idle() -> Result<()> {
    let portal = fast_portal(10, 25);
    login_student(&portal).await;
    assert_eq!(portal.remaining_seconds(), 10);

    sleep(Duration::from_millis(90)).await;
    let sampled = portal.remaining_seconds();
    assert!(sampled < 10, "countdown should have started, got {}", sampled);
    assert!(portal.is_authenticated());

    sleep(Duration::from_millis(60)).await;
    let later = portal.remaining_seconds();
    assert!(later < sampled, "countdown must keep decreasing: {} then {}", sampled, later);
    Ok(())
}

#[tokio::test]
async fn idle_session_expires_into_forced_logout() -> Result<()> {
    let portal = fast_portal(3, 10);
    login_student(&portal).await;

    // 3 ticks of 10ms; wait an order of magnitude longer
    sleep(Duration::from_millis(300)).await;
    assert!(!portal.is_authenticated(), "idle session must force logout at zero");
    assert_eq!(portal.remaining_seconds(), 0);
    assert!(portal.current_user().is_none());
    // Same "no session" state as a normal logout: permission checks just say no
    assert!(!portal.has_permission("view_courses"));
    Ok(())
}

#[tokio::test]
async fn activity_keeps_the_session_alive() -> Result<()> {
    let portal = fast_portal(10, 30);
    login_student(&portal).await;

    // Idle budget is 300ms; keep poking well inside it for longer than that
    for _ in 0..6 {
        sleep(Duration::from_millis(60)).await;
        portal.update_activity();
        assert_eq!(portal.remaining_seconds(), 10, "activity must re-arm to full lifetime");
    }
    assert!(portal.is_authenticated(), "a continuously active session never expires");

    let before = portal.session().last_activity_at.expect("stamped");
    let login_at = portal.session().login_at.expect("stamped");
    assert!(before >= login_at);

    // Stop interacting: now it must expire
    sleep(Duration::from_millis(600)).await;
    assert!(!portal.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn logout_cancels_the_timer() -> Result<()> {
    let portal = fast_portal(5, 20);
    login_student(&portal).await;
    portal.logout();
    assert!(!portal.is_authenticated());

    // No dangling timer may fire against a later session: log in again and
    // confirm the fresh session holds its full lifetime for a moment
    login_student(&portal).await;
    assert_eq!(portal.remaining_seconds(), 5);
    sleep(Duration::from_millis(250)).await;
    assert!(!portal.is_authenticated(), "second session still expires normally");
    Ok(())
}

#[tokio::test]
async fn relogin_replaces_the_countdown() -> Result<()> {
    let portal = fast_portal(8, 25);
    login_student(&portal).await;
    sleep(Duration::from_millis(120)).await;
    assert!(portal.remaining_seconds() < 8);

    // A fresh login over the live session restarts at full lifetime
    login_student(&portal).await;
    assert_eq!(portal.remaining_seconds(), 8);
    Ok(())
}

#[tokio::test]
async fn rapid_relogin_cycles_never_inherit_a_stale_tick() -> Result<()> {
    let portal = fast_portal(4, 30);

    // Churn through sessions faster than any countdown can fire; an orphaned
    // tick from a replaced session must never shave the fresh one
    for _ in 0..5 {
        login_student(&portal).await;
        portal.logout();
    }
    login_student(&portal).await;
    assert_eq!(portal.remaining_seconds(), 4, "a fresh session starts at full lifetime");

    // And the surviving session still expires exactly once, normally
    sleep(Duration::from_millis(400)).await;
    assert!(!portal.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn update_activity_is_a_noop_while_unauthenticated() -> Result<()> {
    let portal = fast_portal(5, 20);
    portal.update_activity();
    assert!(!portal.is_authenticated());
    assert_eq!(portal.remaining_seconds(), 0);
    Ok(())
}

#[tokio::test]
async fn expiry_notifies_subscribers_with_the_cleared_session() -> Result<()> {
    let portal = fast_portal(2, 10);
    let mut rx = portal.subscribe();
    login_student(&portal).await;

    // Drain updates until the session disappears; expiry must arrive as a
    // plain unauthenticated state, not an error
    loop {
        rx.changed().await?;
        let snap = rx.borrow_and_update().clone();
        if !snap.is_authenticated() {
            assert_eq!(snap.remaining_secs, 0);
            break;
        }
    }
    Ok(())
}
