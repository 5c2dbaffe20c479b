//! Runtime configuration for the portal core. Defaults are compiled in and
//! each knob can be overridden through an `ATRIUM_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Idle lifetime granted to a fresh or re-armed session.
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 300;

/// Countdown granularity. One decrement of `remaining_secs` per tick.
pub const DEFAULT_TICK_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub session_lifetime: Duration,
    pub tick: Duration,
    /// Optional JSON account directory; `None` means the caller seeds accounts itself.
    pub directory_path: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            session_lifetime: Duration::from_secs(DEFAULT_SESSION_LIFETIME_SECS),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            directory_path: None,
        }
    }
}

impl PortalConfig {
    /// Read overrides from the environment. Unset variables keep defaults;
    /// present-but-unparsable values are a startup defect, not something to
    /// silently paper over.
    pub fn from_env() -> AppResult<Self> {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("ATRIUM_SESSION_LIFETIME_SECS") {
            let secs: u64 = v.parse().map_err(|_| {
                AppError::config("bad_env".into(), format!("ATRIUM_SESSION_LIFETIME_SECS='{}' is not a positive integer", v))
            })?;
            if secs == 0 {
                return Err(AppError::config("bad_env", "ATRIUM_SESSION_LIFETIME_SECS must be > 0"));
            }
            cfg.session_lifetime = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var("ATRIUM_TICK_MS") {
            let ms: u64 = v.parse().map_err(|_| {
                AppError::config("bad_env".into(), format!("ATRIUM_TICK_MS='{}' is not a positive integer", v))
            })?;
            if ms == 0 {
                return Err(AppError::config("bad_env", "ATRIUM_TICK_MS must be > 0"));
            }
            cfg.tick = Duration::from_millis(ms);
        }
        if let Ok(v) = std::env::var("ATRIUM_DIRECTORY") {
            cfg.directory_path = Some(PathBuf::from(v));
        }
        Ok(cfg)
    }

    /// Lifetime expressed in whole countdown seconds.
    pub fn lifetime_secs(&self) -> u64 {
        self.session_lifetime.as_secs()
    }
}
