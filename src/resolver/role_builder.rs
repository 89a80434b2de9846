//! Role assignment building.
//!
//! Groups whose name matches an eligibility category become roles.
//! Categories are processed in precedence order (the leader category first),
//! and assignment is exclusive: a group matching several categories is
//! recorded under the first one only, with `source` naming that category.

use std::collections::HashSet;

use crate::tables::config::EligibilityConfig;
use crate::tables::model::Table;

/// A derived role definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    /// Role identifier; defaults to the originating group's id.
    pub role_id: String,
    /// Role name; defaults to the originating group's name.
    pub role_name: String,
    /// Role description; the group's description or a generated fallback.
    pub description: String,
    /// Configuration category that made the group eligible.
    pub source: String,
}

/// A (group, role) assignment pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupRole {
    /// Group holding the role.
    pub group_id: String,
    /// Role held.
    pub role_id: String,
}

impl GroupRole {
    /// Convenience constructor.
    pub fn new(group_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            role_id: role_id.into(),
        }
    }
}

/// Map eligible groups to role definitions and direct group-role pairs.
///
/// Returns one [`RoleRecord`] per eligible group and the matching direct
/// [`GroupRole`] pairs; both are empty when nothing is eligible.
#[must_use]
pub fn build_role_assignments(
    groups: &Table,
    eligibility: &EligibilityConfig,
) -> (Vec<RoleRecord>, Vec<GroupRole>) {
    let mut roles = Vec::new();
    let mut direct = Vec::new();
    let mut assigned: HashSet<String> = HashSet::new();

    for category in eligibility.categories() {
        for row in groups.rows() {
            let Some(group_name) = row.get("group_name") else {
                continue;
            };
            if !category.contains(group_name) {
                continue;
            }
            let Some(group_id) = row.get("group_id") else {
                continue;
            };
            if !assigned.insert(group_id.to_string()) {
                continue;
            }

            let description = row
                .get("description")
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("Role for group {group_name}"));

            roles.push(RoleRecord {
                role_id: group_id.to_string(),
                role_name: group_name.to_string(),
                description,
                source: category.name().to_string(),
            });
            direct.push(GroupRole::new(group_id, group_id));
        }
    }

    (roles, direct)
}
