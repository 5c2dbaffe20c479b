//! Static navigation tree and its per-session filter.
//!
//! Items are defined once at startup and validated then: an item nobody can
//! reach is a configuration defect and fails fast instead of silently hiding.
//! Filtering is a pure function of (tree, session) recomputed on every call.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::identity::{PermissionEvaluator, Role, Session};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: String,
    pub label: String,
    /// `None` for a pure grouping header with no destination of its own.
    #[serde(default)]
    pub path: Option<String>,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub required_permission: Option<String>,
    #[serde(default)]
    pub children: Vec<NavigationItem>,
}

impl NavigationItem {
    pub fn leaf(id: &str, label: &str, path: &str, roles: &[Role]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            path: Some(path.to_string()),
            roles: roles.to_vec(),
            required_permission: None,
            children: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.required_permission = Some(permission.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<NavigationItem>) -> Self {
        self.children = children;
        self
    }

    /// Startup check over the whole subtree. Empty `roles` means the item can
    /// never be shown to anyone, which is a defect, not a hiding rule.
    pub fn validate(&self) -> AppResult<()> {
        if self.roles.is_empty() {
            return Err(AppError::config(
                "nav_empty_roles".into(),
                format!("navigation item '{}' allows no roles", self.id),
            ));
        }
        for child in &self.children {
            child.validate()?;
        }
        Ok(())
    }
}

/// Validate a whole tree at startup.
pub fn validate_tree(tree: &[NavigationItem]) -> AppResult<()> {
    for item in tree {
        item.validate()?;
    }
    Ok(())
}

/// Retain the items the current session may see. An item survives if its
/// role list contains the session's role and its required permission (if any)
/// is granted; a parent that lost all children survives only with a path of
/// its own. Unauthenticated sessions see an empty tree.
pub fn filter_navigation(
    tree: &[NavigationItem],
    session: &Session,
    evaluator: &PermissionEvaluator,
) -> Vec<NavigationItem> {
    let Some(role) = session.role() else { return Vec::new(); };
    tree.iter()
        .filter_map(|item| filter_item(item, role, evaluator))
        .collect()
}

fn filter_item(item: &NavigationItem, role: Role, evaluator: &PermissionEvaluator) -> Option<NavigationItem> {
    if !item.roles.contains(&role) {
        return None;
    }
    if let Some(perm) = &item.required_permission {
        if !evaluator.has_permission(perm) {
            return None;
        }
    }
    let children: Vec<NavigationItem> = item
        .children
        .iter()
        .filter_map(|c| filter_item(c, role, evaluator))
        .collect();
    if children.is_empty() && item.path.is_none() {
        // No destination of its own and nothing left to group
        return None;
    }
    let mut kept = item.clone();
    kept.children = children;
    Some(kept)
}
