use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::permission::PermissionSet;

/// Portal role. Closed set; a user holds exactly one for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    /// The dashboard a user of this role is sent to when no other destination applies.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Student => "/student/dashboard",
            Role::Instructor => "/instructor/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Identity record for the authenticated user. Built by the auth provider on
/// successful login, immutable for the lifetime of the session, discarded on
/// logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
    #[serde(default)]
    pub mfa_enabled: bool,
    pub last_login: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_as_string() {
        for r in [Role::Student, Role::Instructor, Role::Admin] {
            let parsed: Role = r.as_str().parse().unwrap();
            assert_eq!(parsed, r);
        }
        assert!("registrar".parse::<Role>().is_err());
    }

    #[test]
    fn home_paths_are_role_scoped() {
        assert_eq!(Role::Student.home_path(), "/student/dashboard");
        assert_eq!(Role::Admin.home_path(), "/admin/dashboard");
        assert_ne!(Role::Instructor.home_path(), Role::Student.home_path());
    }
}
