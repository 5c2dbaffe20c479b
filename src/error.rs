//! Unified application error model.
//! This module provides a common error enum used across the portal core
//! (authentication, directory, navigation config), along with the mapping to
//! the generic message a consumer surfaces to the user.
//!
//! Expected outcomes are not errors here: wrong credentials, session expiry
//! and permission denial are boolean results on their respective components.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Authentication infrastructure failure (directory unreachable/corrupt).
    Auth { code: String, message: String },
    /// Startup configuration defect, e.g. a navigation item nobody can reach.
    Config { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::Config { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::Config { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn config<S: Into<String>>(code: S, msg: S) -> Self { AppError::Config { code: code.into(), message: msg.into() } }
    pub fn io<S: Into<String>>(code: S, msg: S) -> Self { AppError::Io { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// The generic text a login surface shows for a given failure. Infrastructure
    /// failures must read as "try again later", never as "wrong password".
    pub fn user_facing_message(&self) -> &'static str {
        match self {
            AppError::Auth { .. } | AppError::Io { .. } => "Sign-in is temporarily unavailable. Please try again later.",
            AppError::Config { .. } | AppError::Internal { .. } => "Something went wrong. Please contact support.",
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Recover a typed AppError raised at the failure site (the directory
        // wraps its fatal paths this way); anything untyped is Internal.
        match err.downcast::<AppError>() {
            Ok(app) => app,
            Err(err) => AppError::Internal { code: "internal_error".into(), message: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_mapping() {
        let infra = AppError::auth("directory_unavailable", "read failed");
        assert!(infra.user_facing_message().contains("try again later"));
        let io = AppError::io("directory_io", "open failed");
        assert_eq!(io.user_facing_message(), infra.user_facing_message());
        let cfg = AppError::config("nav_empty_roles", "item 'x' allows no roles");
        assert!(cfg.user_facing_message().contains("support"));
    }

    #[test]
    fn display_carries_code_and_message() {
        let e = AppError::config("nav_empty_roles", "bad item");
        assert_eq!(format!("{}", e), "nav_empty_roles: bad item");
    }

    #[test]
    fn anyhow_conversion_recovers_typed_errors() {
        // A typed error raised at the failure site survives the anyhow seam
        let wrapped = anyhow::Error::new(AppError::io("directory_unreadable", "open failed"));
        let app: AppError = wrapped.into();
        assert_eq!(app.code_str(), "directory_unreadable");
        assert!(app.user_facing_message().contains("try again later"));

        // Untyped errors fall back to Internal
        let plain: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(plain.code_str(), "internal_error");
    }
}
