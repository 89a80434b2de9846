//! Population of derivable fields.
//!
//! Directory exports routinely omit fields the rest of the pipeline keys on.
//! This pass fills everything that is *derivable* before validation runs:
//!
//! - `user_id` ← `email` ← `username` (first non-blank source wins)
//! - `username` ← `email`
//! - `full_name` ← `"{first_name} {last_name}"` ← `"User {username}"`
//! - `group_id` ← auto-assigned `G<n>`, skipping ids already in use
//! - group `description` ← `group_name`
//! - wholly-absent Users columns `enabled` / `created_at` / `updated_at` /
//!   `last_login_at` ← fixed defaults
//!
//! Population is pure and infallible: anything that cannot be derived is
//! left blank for the validator to report.  Per-row blanks inside a column
//! the export *did* provide are not defaulted — a half-filled `enabled`
//! column is a data problem, not an omission.

use std::collections::HashSet;

use crate::tables::model::{InputTables, Table};

/// Default `enabled` value for a wholly-absent column.
const DEFAULT_ENABLED: &str = "yes";

/// Placeholder instant for wholly-absent timestamp columns.
const DEFAULT_TIMESTAMP: &str = "2024-03-20T12:00:00Z";

/// Users columns that default as a whole when the export omits them.
const USERS_COLUMN_DEFAULTS: [(&str, &str); 4] = [
    ("enabled", DEFAULT_ENABLED),
    ("created_at", DEFAULT_TIMESTAMP),
    ("updated_at", DEFAULT_TIMESTAMP),
    ("last_login_at", DEFAULT_TIMESTAMP),
];

/// Populate all derivable fields across the input snapshot.
pub fn populate_defaults(tables: &mut InputTables) {
    populate_users(&mut tables.users);
    populate_groups(&mut tables.groups);
}

/// Fill derivable Users fields.
pub fn populate_users(users: &mut Table) {
    for (column, default) in USERS_COLUMN_DEFAULTS {
        if !users.has_column(column) {
            users.ensure_column(column);
            for row in users.rows_mut() {
                row.set(column, default);
            }
        }
    }

    let mut populated_any = [false; 3];
    for row in users.rows_mut() {
        if !row.has("user_id") {
            if let Some(id) = row.get("email").or_else(|| row.get("username")) {
                let id = id.to_string();
                row.set("user_id", id);
                populated_any[0] = true;
            }
        }
        if !row.has("username") {
            if let Some(email) = row.get("email") {
                let email = email.to_string();
                row.set("username", email);
                populated_any[1] = true;
            }
        }
        if !row.has("full_name") {
            let derived = match (row.get("first_name"), row.get("last_name")) {
                (Some(first), Some(last)) => Some(format!("{first} {last}")),
                _ => row.get("username").map(|name| format!("User {name}")),
            };
            if let Some(full_name) = derived {
                row.set("full_name", full_name);
                populated_any[2] = true;
            }
        }
    }

    for (column, populated) in ["user_id", "username", "full_name"]
        .into_iter()
        .zip(populated_any)
    {
        if populated {
            users.ensure_column(column);
        }
    }
}

/// Fill derivable Groups fields, auto-assigning collision-free group ids.
pub fn populate_groups(groups: &mut Table) {
    let mut used_ids: HashSet<String> = groups
        .column_values("group_id")
        .into_iter()
        .collect();
    let mut next_id = 1usize;
    let mut assigned_any = false;
    let mut described_any = false;

    for row in groups.rows_mut() {
        if !row.has("group_id") && row.has("group_name") {
            let id = loop {
                let candidate = format!("G{next_id}");
                next_id += 1;
                if used_ids.insert(candidate.clone()) {
                    break candidate;
                }
            };
            row.set("group_id", id);
            assigned_any = true;
        }
        if !row.has("description") {
            if let Some(name) = row.get("group_name") {
                let name = name.to_string();
                row.set("description", name);
                described_any = true;
            }
        }
    }

    if assigned_any {
        groups.ensure_column("group_id");
    }
    if described_any {
        groups.ensure_column("description");
    }
}
