//! Declarative per-table schema validation.
//!
//! Every table is described by a [`TableSchema`]: a tagged-variant list of
//! field specs (required or conditional, with a value type) plus the
//! conditional-group rules that govern "at least one of"-style presence.
//! One generic [`validate`] routine consumes the descriptions; there is no
//! per-table validator code.
//!
//! Checks happen at two levels.  Column-level: a required field's column
//! must exist, and each conditional group must be satisfiable from the
//! columns the table declares.  Row-level: conditional groups are re-checked
//! per row (a declared column is necessary but not sufficient), required
//! columns must not contain blanks, and typed values must parse.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use crate::tables::model::{
    Row, Table, GROUPS, GROUP_GROUPS, GROUP_ROLES, ROLES, USERS, USER_GROUPS, USER_ROLES,
};

/// Accepted boolean literals, matched case-insensitively.
pub const BOOLEAN_LITERALS: [&str; 6] = ["true", "false", "yes", "no", "1", "0"];

/// Timestamp strictness profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationProfile {
    /// Timestamps must carry explicit timezone information.
    #[default]
    Strict,
    /// Timezone-less ISO-8601 timestamps are accepted.
    Lenient,
}

impl fmt::Display for ValidationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProfile::Strict => write!(f, "strict"),
            ValidationProfile::Lenient => write!(f, "lenient"),
        }
    }
}

impl std::str::FromStr for ValidationProfile {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ValidationProfile::Strict),
            "lenient" => Ok(ValidationProfile::Lenient),
            _ => Err(format!("Invalid validation profile: {s}")),
        }
    }
}

/// Classification of a validation failure, per the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Missing table/field or unparsable typed value.
    Structural,
    /// Dangling reference or hierarchy cycle.
    Relational,
}

/// A single human-readable validation failure.
///
/// These are collected, never thrown: one validation pass reports every
/// problem it finds, and a non-empty collection gates resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Failure classification.
    pub kind: ValidationKind,
    /// Human-readable message referencing the offending table/field/ids.
    pub message: String,
}

impl ValidationError {
    /// A structural failure.
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: ValidationKind::Structural,
            message: message.into(),
        }
    }

    /// A relational failure.
    pub(crate) fn relational(message: impl Into<String>) -> Self {
        Self {
            kind: ValidationKind::Relational,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Value type constraint for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Free-form text.
    Text,
    /// One of [`BOOLEAN_LITERALS`], case-insensitive.
    Boolean,
    /// ISO-8601 timestamp; timezone required in the strict profile.
    Timestamp,
}

/// Presence requirement for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The column must exist and every row must hold a value.
    Required,
    /// Presence is governed by the named conditional group.
    Conditional(&'static str),
}

/// Declarative description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Column name.
    pub name: &'static str,
    /// Presence requirement.
    pub kind: FieldKind,
    /// Value type constraint.
    pub ty: ValueType,
}

/// Row-level presence rule for a conditional group.
#[derive(Debug, Clone, Copy)]
pub enum GroupRule {
    /// At least `min_required` of `fields` must be non-null.
    AtLeast {
        /// Fields participating in the group.
        fields: &'static [&'static str],
        /// Minimum number of non-null values per row.
        min_required: usize,
    },
    /// Either `either` is non-null, or every field in `all_of` is.
    EitherOr {
        /// The standalone alternative.
        either: &'static str,
        /// The combined alternative.
        all_of: &'static [&'static str],
    },
}

/// A conditional field group with its user-facing message.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalGroup {
    /// Group name, referenced by [`FieldKind::Conditional`].
    pub name: &'static str,
    /// Presence rule.
    pub rule: GroupRule,
    /// Message emitted when the rule is unsatisfied.
    pub message: &'static str,
}

/// Declarative schema for one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    /// Table name.
    pub table: &'static str,
    /// Field descriptions.
    pub fields: &'static [FieldSpec],
    /// Conditional groups.
    pub groups: &'static [ConditionalGroup],
}

static USERS_SCHEMA: TableSchema = TableSchema {
    table: USERS,
    fields: &[
        FieldSpec { name: "user_id", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "username", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "email", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "full_name", kind: FieldKind::Conditional("name"), ty: ValueType::Text },
        FieldSpec { name: "first_name", kind: FieldKind::Conditional("name"), ty: ValueType::Text },
        FieldSpec { name: "last_name", kind: FieldKind::Conditional("name"), ty: ValueType::Text },
        FieldSpec { name: "enabled", kind: FieldKind::Required, ty: ValueType::Boolean },
        FieldSpec { name: "created_at", kind: FieldKind::Required, ty: ValueType::Timestamp },
        FieldSpec { name: "updated_at", kind: FieldKind::Required, ty: ValueType::Timestamp },
        FieldSpec { name: "last_login_at", kind: FieldKind::Required, ty: ValueType::Timestamp },
    ],
    groups: &[
        ConditionalGroup {
            name: "identifier",
            rule: GroupRule::AtLeast { fields: &["user_id", "username", "email"], min_required: 1 },
            message: "At least one of user_id, username, or email must be present",
        },
        ConditionalGroup {
            name: "name",
            rule: GroupRule::EitherOr { either: "full_name", all_of: &["first_name", "last_name"] },
            message: "Either full_name or both first_name and last_name must be present",
        },
    ],
};

static GROUPS_SCHEMA: TableSchema = TableSchema {
    table: GROUPS,
    fields: &[
        FieldSpec { name: "group_id", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "group_name", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "description", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[ConditionalGroup {
        name: "identifier",
        rule: GroupRule::AtLeast { fields: &["group_id", "group_name"], min_required: 1 },
        message: "At least one of group_id or group_name must be present",
    }],
};

static ROLES_SCHEMA: TableSchema = TableSchema {
    table: ROLES,
    fields: &[
        FieldSpec { name: "role_id", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "role_name", kind: FieldKind::Conditional("identifier"), ty: ValueType::Text },
        FieldSpec { name: "description", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[ConditionalGroup {
        name: "identifier",
        rule: GroupRule::AtLeast { fields: &["role_id", "role_name"], min_required: 1 },
        message: "At least one of role_id or role_name must be present",
    }],
};

static USER_GROUPS_SCHEMA: TableSchema = TableSchema {
    table: USER_GROUPS,
    fields: &[
        FieldSpec { name: "user_id", kind: FieldKind::Required, ty: ValueType::Text },
        FieldSpec { name: "group_id", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[],
};

static GROUP_GROUPS_SCHEMA: TableSchema = TableSchema {
    table: GROUP_GROUPS,
    fields: &[
        FieldSpec { name: "parent_group_id", kind: FieldKind::Required, ty: ValueType::Text },
        FieldSpec { name: "child_group_id", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[],
};

static USER_ROLES_SCHEMA: TableSchema = TableSchema {
    table: USER_ROLES,
    fields: &[
        FieldSpec { name: "user_id", kind: FieldKind::Required, ty: ValueType::Text },
        FieldSpec { name: "role_id", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[],
};

static GROUP_ROLES_SCHEMA: TableSchema = TableSchema {
    table: GROUP_ROLES,
    fields: &[
        FieldSpec { name: "group_id", kind: FieldKind::Required, ty: ValueType::Text },
        FieldSpec { name: "role_id", kind: FieldKind::Required, ty: ValueType::Text },
    ],
    groups: &[],
};

/// Look up the schema for a table name.
#[must_use]
pub fn schema_for(table: &str) -> Option<&'static TableSchema> {
    match table {
        USERS => Some(&USERS_SCHEMA),
        GROUPS => Some(&GROUPS_SCHEMA),
        ROLES => Some(&ROLES_SCHEMA),
        USER_GROUPS => Some(&USER_GROUPS_SCHEMA),
        GROUP_GROUPS => Some(&GROUP_GROUPS_SCHEMA),
        USER_ROLES => Some(&USER_ROLES_SCHEMA),
        GROUP_ROLES => Some(&GROUP_ROLES_SCHEMA),
        _ => None,
    }
}

/// Validate a table against its declarative schema.
///
/// An unknown table name or an empty table short-circuits with a single
/// error; otherwise every field and group check runs and all failures are
/// collected.
#[must_use]
pub fn validate(table: &Table, profile: ValidationProfile) -> Vec<ValidationError> {
    let Some(schema) = schema_for(table.name()) else {
        return vec![ValidationError::structural(format!(
            "no schema defined for {}",
            table.name()
        ))];
    };
    if table.is_empty() {
        return vec![ValidationError::structural(format!("{} is empty", table.name()))];
    }

    let mut errors = Vec::new();

    // Column-level presence.
    let mut unsatisfied_groups: HashSet<&str> = HashSet::new();
    for group in schema.groups {
        if !group_satisfied_by_columns(group, table) {
            unsatisfied_groups.insert(group.name);
            errors.push(ValidationError::structural(format!(
                "{}: {}",
                schema.table, group.message
            )));
        }
    }
    for field in schema.fields {
        if matches!(field.kind, FieldKind::Required) && !table.has_column(field.name) {
            errors.push(ValidationError::structural(format!(
                "{}: Missing required field: {}",
                schema.table, field.name
            )));
        }
    }

    // Row-level conditional groups; column-level satisfaction is necessary
    // but not sufficient.
    for group in schema.groups {
        if unsatisfied_groups.contains(group.name) {
            continue;
        }
        for (idx, row) in table.rows().iter().enumerate() {
            if !group_satisfied_by_row(group, row) {
                errors.push(ValidationError::structural(format!(
                    "{} row {}: {}",
                    schema.table,
                    idx + 1,
                    group.message
                )));
            }
        }
    }

    // Per-column value checks.
    for field in schema.fields {
        if !table.has_column(field.name) {
            continue;
        }
        if matches!(field.kind, FieldKind::Required)
            && table.rows().iter().any(|row| !row.has(field.name))
        {
            errors.push(ValidationError::structural(format!(
                "{}: Column {} contains null values",
                schema.table, field.name
            )));
        }
        match field.ty {
            ValueType::Text => {}
            ValueType::Boolean => check_boolean_column(schema.table, field.name, table, &mut errors),
            ValueType::Timestamp => {
                check_timestamp_column(schema.table, field.name, table, profile, &mut errors);
            }
        }
    }

    errors
}

fn group_satisfied_by_columns(group: &ConditionalGroup, table: &Table) -> bool {
    match group.rule {
        GroupRule::AtLeast { fields, min_required } => {
            fields.iter().copied().filter(|f| table.has_column(f)).count() >= min_required
        }
        GroupRule::EitherOr { either, all_of } => {
            table.has_column(either) || all_of.iter().copied().all(|f| table.has_column(f))
        }
    }
}

fn group_satisfied_by_row(group: &ConditionalGroup, row: &Row) -> bool {
    match group.rule {
        GroupRule::AtLeast { fields, min_required } => {
            fields.iter().copied().filter(|f| row.has(f)).count() >= min_required
        }
        GroupRule::EitherOr { either, all_of } => {
            row.has(either) || all_of.iter().copied().all(|f| row.has(f))
        }
    }
}

fn check_boolean_column(
    table_name: &str,
    column: &str,
    table: &Table,
    errors: &mut Vec<ValidationError>,
) {
    let invalid: BTreeSet<&str> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| {
            !BOOLEAN_LITERALS
                .iter()
                .any(|literal| literal.eq_ignore_ascii_case(value))
        })
        .collect();

    if !invalid.is_empty() {
        let values: Vec<&str> = invalid.into_iter().collect();
        errors.push(ValidationError::structural(format!(
            "{table_name}: Invalid boolean value(s) in {column}: {}",
            values.join(", ")
        )));
    }
}

/// Outcome of parsing one timestamp value.
enum TimestampCheck {
    Ok,
    MissingTimezone,
    Unparsable,
}

/// ISO-8601 shapes that parse but carry no offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

fn check_timestamp(value: &str) -> TimestampCheck {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return TimestampCheck::Ok;
    }
    if NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
    {
        return TimestampCheck::MissingTimezone;
    }
    TimestampCheck::Unparsable
}

fn check_timestamp_column(
    table_name: &str,
    column: &str,
    table: &Table,
    profile: ValidationProfile,
    errors: &mut Vec<ValidationError>,
) {
    let mut missing_timezone = false;
    let mut unparsable = false;
    for row in table.rows() {
        if let Some(value) = row.get(column) {
            match check_timestamp(value) {
                TimestampCheck::Ok => {}
                TimestampCheck::MissingTimezone => missing_timezone = true,
                TimestampCheck::Unparsable => unparsable = true,
            }
        }
    }

    if missing_timezone && profile == ValidationProfile::Strict {
        errors.push(ValidationError::structural(format!(
            "{table_name}: Invalid datetime format in {column} - must be ISO 8601 with timezone"
        )));
    }
    if unparsable {
        errors.push(ValidationError::structural(format!(
            "{table_name}: Invalid datetime format in {column}"
        )));
    }
}
