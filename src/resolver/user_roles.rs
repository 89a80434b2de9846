//! User-role derivation.
//!
//! An inner equi-join of user-group memberships against the closed
//! group-role table on `group_id`, projected to `(user_id, role_id)` and
//! deduplicated.  Users in zero role-bearing groups simply yield no rows.

use std::collections::{BTreeSet, HashMap};

use crate::resolver::role_builder::GroupRole;

/// A (user, role) assignment pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserRole {
    /// User holding the role.
    pub user_id: String,
    /// Role held.
    pub role_id: String,
}

impl UserRole {
    /// Convenience constructor.
    pub fn new(user_id: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role_id: role_id.into(),
        }
    }
}

/// Join memberships against closed group-role pairs.
///
/// The result is deduplicated and sorted by `(user_id, role_id)`.
#[must_use]
pub fn resolve_user_roles(
    memberships: &[(String, String)],
    group_roles: &[GroupRole],
) -> Vec<UserRole> {
    let mut roles_by_group: HashMap<&str, Vec<&str>> = HashMap::new();
    for assignment in group_roles {
        roles_by_group
            .entry(assignment.group_id.as_str())
            .or_default()
            .push(assignment.role_id.as_str());
    }

    let mut resolved: BTreeSet<UserRole> = BTreeSet::new();
    for (user_id, group_id) in memberships {
        if let Some(roles) = roles_by_group.get(group_id.as_str()) {
            for role in roles {
                resolved.insert(UserRole::new(user_id, *role));
            }
        }
    }

    resolved.into_iter().collect()
}
