//! Cross-table referential integrity and hierarchy-cycle validation.
//!
//! Reference checks diff each edge column against the id set of the table it
//! points at and report a single error per violated column, listing every
//! offending value.  Cycle detection runs a depth-first search over the
//! parent→child nesting graph with an explicit stack and an on-stack set, so
//! arbitrarily deep hierarchies cannot exhaust the call stack and shared
//! ancestors (diamonds) are never mistaken for cycles.  At most one cycle is
//! reported — the first one found, with its path.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::tables::model::Table;
use crate::validator::schema::ValidationError;

/// Validate membership and hierarchy references plus hierarchy acyclicity.
#[must_use]
pub fn validate_relationships(
    users: &Table,
    groups: &Table,
    memberships: &Table,
    hierarchy: &Table,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let known_users = users.column_values("user_id");
    let known_groups = groups.column_values("group_id");

    check_references(memberships, "user_id", &known_users, &mut errors);
    check_references(memberships, "group_id", &known_groups, &mut errors);
    check_references(hierarchy, "parent_group_id", &known_groups, &mut errors);
    check_references(hierarchy, "child_group_id", &known_groups, &mut errors);

    if let Some(cycle) = find_cycle(&hierarchy.pairs("parent_group_id", "child_group_id")) {
        errors.push(ValidationError::relational(format!(
            "Circular reference detected in group hierarchy: {}",
            cycle.join(" -> ")
        )));
    }

    errors
}

/// Report every value of `column` that does not appear in `known`.
fn check_references(
    table: &Table,
    column: &str,
    known: &BTreeSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    let missing: BTreeSet<&str> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !known.contains(*value))
        .collect();

    if !missing.is_empty() {
        let values: Vec<&str> = missing.into_iter().collect();
        errors.push(ValidationError::relational(format!(
            "Invalid {column} values in {}: {}",
            table.name(),
            values.join(", ")
        )));
    }
}

/// Find the first cycle in the parent→child edge set, if any.
///
/// Returns the cycle as a node path whose first and last elements coincide,
/// e.g. `["G1", "G2", "G1"]`.  Depth-first search with an explicit frame
/// stack; a neighbor already on the current path is a cycle, a neighbor
/// merely visited on an earlier branch is not.
#[must_use]
pub fn find_cycle(edges: &[(String, String)]) -> Option<Vec<String>> {
    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (parent, child) in edges {
        adjacency.entry(parent).or_default().push(child);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();

    let starts: Vec<&str> = adjacency.keys().copied().collect();
    for start in starts {
        if visited.contains(start) {
            continue;
        }

        // Frame: a node plus the index of the next child to explore.
        let mut frames: Vec<(&str, usize)> = vec![(start, 0)];
        visited.insert(start);
        on_stack.insert(start);
        path.push(start);

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            let children = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&child) = children.get(frame.1) {
                frame.1 += 1;
                if on_stack.contains(child) {
                    let cycle_start = path
                        .iter()
                        .position(|&n| n == child)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[cycle_start..].iter().map(ToString::to_string).collect();
                    cycle.push(child.to_string());
                    return Some(cycle);
                }
                if visited.insert(child) {
                    on_stack.insert(child);
                    path.push(child);
                    frames.push((child, 0));
                }
            } else {
                frames.pop();
                on_stack.remove(node);
                path.pop();
            }
        }
    }

    None
}
