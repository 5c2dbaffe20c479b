//! Account directory backing the authenticator.
//!
//! Stands in for the institution's identity backend: a JSON-loadable set of
//! accounts keyed by email, with Argon2 PHC password hashes. Lookup failures
//! are expected outcomes; an unreadable or corrupt directory file is the one
//! fatal path in login.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::identity::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mfa_enabled: bool,
}

fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| anyhow!(e.to_string()))?.to_string();
    Ok(phc)
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else { false }
}

/// In-memory account set, optionally loaded from / saved to a JSON file.
/// Emails are matched case-insensitively.
#[derive(Default)]
pub struct Directory {
    accounts: RwLock<HashMap<String, Account>>,
}

impl Directory {
    pub fn new() -> Self { Self::default() }

    /// Fatal paths carry a typed [`AppError`] so the login surface can tell
    /// "try again later" apart from a wrong password.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            anyhow::Error::new(AppError::io(
                "directory_unreadable".into(),
                format!("directory file '{}' unreadable: {}", path.display(), e),
            ))
        })?;
        let list: Vec<Account> = serde_json::from_str(&raw).map_err(|e| {
            anyhow::Error::new(AppError::auth(
                "directory_corrupt".into(),
                format!("directory file '{}' corrupt: {}", path.display(), e),
            ))
        })?;
        let dir = Self::new();
        {
            let mut map = dir.accounts.write();
            for acct in list {
                map.insert(acct.email.to_lowercase(), acct);
            }
        }
        Ok(dir)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() { std::fs::create_dir_all(dir).ok(); }
        let list: Vec<Account> = self.accounts.read().values().cloned().collect();
        let raw = serde_json::to_string_pretty(&list)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Register (or replace) an account, hashing the password here so callers
    /// never handle PHC strings themselves.
    #[allow(clippy::too_many_arguments)]
    pub fn add_account(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        role: Role,
        student_id: Option<&str>,
        employee_id: Option<&str>,
        permissions: &[&str],
        mfa_enabled: bool,
    ) -> Result<()> {
        let acct = Account {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password_hash: hash_password(password)?,
            role,
            student_id: student_id.map(|s| s.to_string()),
            employee_id: employee_id.map(|s| s.to_string()),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            mfa_enabled,
        };
        self.accounts.write().insert(email.to_lowercase(), acct);
        Ok(())
    }

    pub fn remove_account(&self, email: &str) -> bool {
        self.accounts.write().remove(&email.to_lowercase()).is_some()
    }

    pub fn len(&self) -> usize { self.accounts.read().len() }

    pub fn is_empty(&self) -> bool { self.accounts.read().is_empty() }

    /// Credential check. `Ok(Some(account))` on a match, `Ok(None)` for an
    /// unknown email or wrong password — both are the same expected outcome
    /// from the caller's side.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<Account>> {
        let map = self.accounts.read();
        let Some(acct) = map.get(&email.to_lowercase()) else { return Ok(None); };
        if verify_password(&acct.password_hash, password) {
            Ok(Some(acct.clone()))
        } else {
            Ok(None)
        }
    }

    /// Provision one demo account per role if the directory is empty. The
    /// admin carries the wildcard grant by convention.
    pub fn seed_demo(&self) -> Result<()> {
        if !self.is_empty() { return Ok(()); }
        self.add_account(
            "student@atrium.edu", "student", "Sam Doyle", Role::Student,
            Some("S-2024-0117"), None,
            &["view_courses", "view_grades", "pay_fees"], false,
        )?;
        self.add_account(
            "instructor@atrium.edu", "instructor", "Dr. Priya Nair", Role::Instructor,
            None, Some("E-0482"),
            &["view_courses", "grade_students", "manage_attendance"], true,
        )?;
        self.add_account(
            "admin@atrium.edu", "admin", "Alex Winter", Role::Admin,
            None, Some("E-0001"),
            &["*"], true,
        )?;
        Ok(())
    }
}
