//! Group hierarchy closure.
//!
//! Computes the transitive closure of "group G holds role R" over the
//! nesting graph.  Under the default direction, roles flow downward: a group
//! holds its own direct roles plus the direct roles of every ancestor.  The
//! walk is an explicit worklist over inheritance links with a single visited
//! set per starting group, so it terminates on cyclic input and never
//! recurses — cycles are rejected upstream by validation, but the resolver
//! must not be the component that loops if handed one anyway.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::resolver::role_builder::GroupRole;

/// Direction in which roles propagate along hierarchy edges.
///
/// Historical exports disagree on how `(parent, child)` nesting should be
/// read, so the direction is a policy value rather than a hard-coded
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InheritanceDirection {
    /// A group inherits every role its ancestors hold (roles flow down).
    #[default]
    ParentToChild,
    /// A group inherits every role its descendants hold (roles flow up).
    ChildToParent,
}

impl fmt::Display for InheritanceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InheritanceDirection::ParentToChild => write!(f, "parent-to-child"),
            InheritanceDirection::ChildToParent => write!(f, "child-to-parent"),
        }
    }
}

impl std::str::FromStr for InheritanceDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parent-to-child" => Ok(InheritanceDirection::ParentToChild),
            "child-to-parent" => Ok(InheritanceDirection::ChildToParent),
            _ => Err(format!("Invalid inheritance direction: {s}")),
        }
    }
}

/// Close the direct group-role assignments over the hierarchy edges.
///
/// The result is deduplicated, sorted by `(group_id, role_id)`, a superset
/// of `direct`, and idempotent: closing an already-closed table changes
/// nothing.  Groups that end up with no roles are absent from the output.
#[must_use]
pub fn resolve_group_roles(
    direct: &[GroupRole],
    edges: &[(String, String)],
    direction: InheritanceDirection,
) -> Vec<GroupRole> {
    // Adjacency: group -> groups it inherits roles from.
    let mut inherits_from: HashMap<&str, Vec<&str>> = HashMap::new();
    for (parent, child) in edges {
        let (heir, source) = match direction {
            InheritanceDirection::ParentToChild => (child.as_str(), parent.as_str()),
            InheritanceDirection::ChildToParent => (parent.as_str(), child.as_str()),
        };
        inherits_from.entry(heir).or_default().push(source);
    }

    let mut direct_roles: HashMap<&str, Vec<&str>> = HashMap::new();
    for assignment in direct {
        direct_roles
            .entry(assignment.group_id.as_str())
            .or_default()
            .push(assignment.role_id.as_str());
    }

    // Every group appearing anywhere in the edges or the direct table.
    let mut all_groups: BTreeSet<&str> = direct_roles.keys().copied().collect();
    for (parent, child) in edges {
        all_groups.insert(parent);
        all_groups.insert(child);
    }

    let mut closed: BTreeSet<GroupRole> = BTreeSet::new();
    for group in all_groups {
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        visited.insert(group);
        let mut worklist = vec![group];

        while let Some(node) = worklist.pop() {
            if let Some(roles) = direct_roles.get(node) {
                for role in roles {
                    closed.insert(GroupRole::new(group, *role));
                }
            }
            if let Some(sources) = inherits_from.get(node) {
                for &source in sources {
                    if visited.insert(source) {
                        worklist.push(source);
                    }
                }
            }
        }
    }

    closed.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    fn pair(group: &str, role: &str) -> GroupRole {
        GroupRole::new(group, role)
    }

    #[test]
    fn children_inherit_roles_from_all_ancestors() {
        // G1 -> G2 -> G3; G1 and G2 hold their own roles.
        let direct = vec![pair("G1", "R1"), pair("G2", "R2")];
        let closed = resolve_group_roles(
            &direct,
            &edges(&[("G1", "G2"), ("G2", "G3")]),
            InheritanceDirection::ParentToChild,
        );

        assert_eq!(
            closed,
            vec![
                pair("G1", "R1"),
                pair("G2", "R1"),
                pair("G2", "R2"),
                pair("G3", "R1"),
                pair("G3", "R2"),
            ]
        );
    }

    #[test]
    fn reversed_direction_flows_roles_upward() {
        let direct = vec![pair("G2", "R2")];
        let closed = resolve_group_roles(
            &direct,
            &edges(&[("G1", "G2")]),
            InheritanceDirection::ChildToParent,
        );

        assert_eq!(closed, vec![pair("G1", "R2"), pair("G2", "R2")]);
    }

    #[test]
    fn closure_is_a_superset_of_direct_assignments() {
        let direct = vec![pair("G1", "R1"), pair("G5", "R5")];
        let closed = resolve_group_roles(
            &direct,
            &edges(&[("G1", "G2")]),
            InheritanceDirection::ParentToChild,
        );

        for assignment in &direct {
            assert!(
                closed.contains(assignment),
                "direct pair {assignment:?} missing from closure"
            );
        }
    }

    #[test]
    fn closure_is_idempotent() {
        let direct = vec![pair("G1", "R1"), pair("G2", "R2")];
        let hierarchy = edges(&[("G1", "G2"), ("G2", "G3")]);

        let once = resolve_group_roles(&direct, &hierarchy, InheritanceDirection::ParentToChild);
        let twice = resolve_group_roles(&once, &hierarchy, InheritanceDirection::ParentToChild);
        assert_eq!(once, twice);
    }

    #[test]
    fn diamond_produces_each_inherited_role_once() {
        // P -> A -> C and P -> B -> C; P holds R.
        let direct = vec![pair("P", "R")];
        let hierarchy = edges(&[("P", "A"), ("P", "B"), ("A", "C"), ("B", "C")]);

        let closed = resolve_group_roles(&direct, &hierarchy, InheritanceDirection::ParentToChild);
        let c_roles: Vec<&GroupRole> = closed.iter().filter(|a| a.group_id == "C").collect();
        assert_eq!(c_roles, vec![&pair("C", "R")]);
    }

    #[test]
    fn cyclic_input_terminates_and_unions_roles() {
        // Defense in depth: validation rejects cycles, the walk must still halt.
        let direct = vec![pair("G1", "R1"), pair("G2", "R2")];
        let hierarchy = edges(&[("G1", "G2"), ("G2", "G1")]);

        let closed = resolve_group_roles(&direct, &hierarchy, InheritanceDirection::ParentToChild);
        assert_eq!(
            closed,
            vec![
                pair("G1", "R1"),
                pair("G1", "R2"),
                pair("G2", "R1"),
                pair("G2", "R2"),
            ]
        );
    }

    #[test]
    fn role_bearing_groups_only_appear_in_output() {
        let direct = vec![pair("G1", "R1")];
        // G9 participates in the hierarchy but never gains a role.
        let closed = resolve_group_roles(
            &direct,
            &edges(&[("G9", "G1")]),
            InheritanceDirection::ParentToChild,
        );

        assert!(closed.iter().all(|a| a.group_id != "G9"));
        assert_eq!(closed, vec![pair("G1", "R1")]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        // 10k-deep nesting exercises the explicit worklist.
        let mut hierarchy = Vec::new();
        for i in 0..10_000 {
            hierarchy.push((format!("G{i}"), format!("G{}", i + 1)));
        }
        let direct = vec![pair("G0", "R0")];

        let closed = resolve_group_roles(&direct, &hierarchy, InheritanceDirection::ParentToChild);
        assert!(closed.contains(&pair("G10000", "R0")));
        assert_eq!(closed.len(), 10_001);
    }
}
