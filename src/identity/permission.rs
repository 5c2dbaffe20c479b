//! Fine-grained capabilities. Permissions are independent of role: two users
//! with the same role may carry different sets, and the wildcard is an explicit
//! sentinel rather than a pattern over arbitrary strings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The literal stored in the directory for a grant-everything permission.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Permission {
    /// Satisfies every capability request.
    All,
    /// A concrete capability name, e.g. "grade_students".
    Named(String),
}

impl Permission {
    pub fn parse(s: &str) -> Self {
        if s == WILDCARD { Permission::All } else { Permission::Named(s.to_string()) }
    }
}

impl From<String> for Permission {
    fn from(s: String) -> Self { Permission::parse(&s) }
}

impl From<Permission> for String {
    fn from(p: Permission) -> Self {
        match p {
            Permission::All => WILDCARD.to_string(),
            Permission::Named(s) => s,
        }
    }
}

/// The set of capabilities attached to a user at login time. Lookup is exact:
/// either the literal name is present or the wildcard is, nothing in between.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self { Self(HashSet::new()) }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(names.into_iter().map(|n| Permission::parse(n.as_ref())).collect())
    }

    /// Single wildcard grant, the conventional admin set.
    pub fn wildcard() -> Self {
        Self(HashSet::from([Permission::All]))
    }

    pub fn insert(&mut self, p: Permission) { self.0.insert(p); }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    /// True if the set holds `capability` literally, or holds the wildcard.
    pub fn grants(&self, capability: &str) -> bool {
        if self.0.contains(&Permission::All) {
            return true;
        }
        self.0.contains(&Permission::Named(capability.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> { self.0.iter() }
}
