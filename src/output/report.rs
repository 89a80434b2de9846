//! Markdown run-summary report.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::resolver::role_builder::RoleRecord;
use crate::tables::model::Table;

/// Build a markdown report with table counts and roles by source category.
#[must_use]
pub fn build_report(tables: &[Table], roles: &[RoleRecord]) -> String {
    let mut report = String::new();

    writeln!(report, "# ad2rbac Role Mapping Report").unwrap();
    writeln!(report).unwrap();

    writeln!(report, "## Table Summary").unwrap();
    writeln!(report).unwrap();
    writeln!(report, "| Table | Rows |").unwrap();
    writeln!(report, "|-------|------|").unwrap();
    for table in tables {
        writeln!(report, "| {} | {} |", table.name(), table.len()).unwrap();
    }

    let mut by_source: BTreeMap<&str, usize> = BTreeMap::new();
    for role in roles {
        *by_source.entry(role.source.as_str()).or_insert(0) += 1;
    }

    if !by_source.is_empty() {
        writeln!(report).unwrap();
        writeln!(report, "## Roles by Source Category").unwrap();
        writeln!(report).unwrap();
        writeln!(report, "| Category | Roles |").unwrap();
        writeln!(report, "|----------|-------|").unwrap();
        for (source, count) in by_source {
            writeln!(report, "| {source} | {count} |").unwrap();
        }
    }

    report
}
