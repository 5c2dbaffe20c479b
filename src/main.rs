use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use atrium::config::PortalConfig;
use atrium::directory::Directory;
use atrium::identity::LoginRequest;
use atrium::portal::{default_navigation, Portal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let config = PortalConfig::from_env()?;
    info!(
        target: "atrium",
        "Atrium portal core starting: RUST_LOG='{}', lifetime={}s, tick={}ms, directory={:?}",
        rust_log, config.lifetime_secs(), config.tick.as_millis(), config.directory_path
    );

    let directory = match &config.directory_path {
        Some(path) => Arc::new(Directory::from_json_file(path)?),
        None => {
            let dir = Directory::new();
            dir.seed_demo()?;
            info!(target: "atrium", "no ATRIUM_DIRECTORY set, seeded {} demo accounts", dir.len());
            Arc::new(dir)
        }
    };

    let portal = Portal::new(&config, directory, default_navigation())?;

    // Demo loop: sign in as the seeded student and let the countdown run so
    // the session log shows the tick/expiry behavior end to end.
    let ok = portal.login(&LoginRequest::new("student@atrium.edu", "student"))?;
    info!(target: "atrium", "demo login succeeded={}", ok);
    if ok {
        if let Some(user) = portal.current_user() {
            info!(target: "atrium", "signed in as {} ({})", user.display_name, user.role);
        }
        info!(target: "atrium", "visible navigation entries: {}", portal.filter_navigation().len());
        let mut rx = portal.subscribe();
        while rx.changed().await.is_ok() {
            let s = rx.borrow().clone();
            if !s.is_authenticated() {
                info!(target: "atrium", "session ended, returning to {}", atrium::access::LOGIN_PATH);
                break;
            }
            if s.remaining_secs % 60 == 0 {
                info!(target: "atrium", "{}s remaining", s.remaining_secs);
            }
        }
    }
    Ok(())
}
