//! In-memory table representation.
//!
//! Every table is a list of string rows keyed by column name.  A cell that is
//! missing, empty, or whitespace-only reads as absent — the directory exports
//! this tool consumes routinely pad tables with blank cells, and the
//! validator's presence rules are defined over "non-null" values.  Column
//! order is preserved from input (and extended at the end by populated
//! columns) so the written output is stable.

use std::collections::{BTreeSet, HashMap};

/// Users input table name.
pub const USERS: &str = "Users";
/// Groups input table name.
pub const GROUPS: &str = "Groups";
/// User→group membership input table name.
pub const USER_GROUPS: &str = "User_Groups";
/// Group→group nesting input table name.
pub const GROUP_GROUPS: &str = "Group_Groups";
/// Derived role definition table name.
pub const ROLES: &str = "Roles";
/// Derived user-role assignment table name.
pub const USER_ROLES: &str = "User_Roles";
/// Derived group-role assignment table name.
pub const GROUP_ROLES: &str = "Group_Roles";

/// The four tables every input snapshot must provide.
pub const REQUIRED_TABLES: [&str; 4] = [USERS, GROUPS, USER_GROUPS, GROUP_GROUPS];

/// Fixed order in which output tables are written.
pub const OUTPUT_ORDER: [&str; 7] = [
    USERS,
    GROUPS,
    USER_GROUPS,
    GROUP_GROUPS,
    ROLES,
    USER_ROLES,
    GROUP_ROLES,
];

/// A single record keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell value, replacing any existing value for the column.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.values.insert(column.to_string(), value.into());
    }

    /// Trimmed cell value, or `None` when the cell is missing or blank.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Whether the cell holds a non-blank value.
    #[must_use]
    pub fn has(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

/// An in-memory table: a name, an ordered column list, and rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given column order.
    pub fn new<C: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = C>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in output order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the table declares the given column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Append the column to the declared set if it is not already present.
    pub fn ensure_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// All rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to the rows, for the population pass.
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-blank values of a column, sorted.
    #[must_use]
    pub fn column_values(&self, column: &str) -> BTreeSet<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .map(ToString::to_string)
            .collect()
    }

    /// Project rows onto an ordered `(left, right)` column pair.
    ///
    /// Rows where either cell is blank are skipped; the caller's referential
    /// validation is responsible for reporting dangling values.
    #[must_use]
    pub fn pairs(&self, left: &str, right: &str) -> Vec<(String, String)> {
        self.rows
            .iter()
            .filter_map(|row| {
                let l = row.get(left)?;
                let r = row.get(right)?;
                Some((l.to_string(), r.to_string()))
            })
            .collect()
    }
}

/// The four validated input tables of one snapshot.
#[derive(Debug, Clone)]
pub struct InputTables {
    /// Users table.
    pub users: Table,
    /// Groups table.
    pub groups: Table,
    /// User→group membership edges.
    pub user_groups: Table,
    /// Group→group hierarchy edges.
    pub group_groups: Table,
}

impl InputTables {
    /// Iterate the four tables in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        [
            &self.users,
            &self.groups,
            &self.user_groups,
            &self.group_groups,
        ]
        .into_iter()
    }
}
