//! Output assembly and writing.
//!
//! The seven output tables are written as one CSV file each, in the fixed
//! order Users, Groups, User_Groups, Group_Groups, Roles, User_Roles,
//! Group_Roles, plus a `report.md` summary.  Nothing is written until
//! validation has passed, so a failed run leaves no partial output behind.

use std::path::Path;

use crate::error::PipelineError;
use crate::output::report;
use crate::resolver::role_builder::{GroupRole, RoleRecord};
use crate::resolver::user_roles::UserRole;
use crate::tables::model::{InputTables, Row, Table, GROUP_ROLES, ROLES, USER_ROLES};

/// File name of the markdown summary written next to the tables.
pub const REPORT_FILE: &str = "report.md";

/// Assemble the seven output tables in their fixed write order.
#[must_use]
pub fn output_tables(
    inputs: &InputTables,
    roles: &[RoleRecord],
    group_roles: &[GroupRole],
    user_roles: &[UserRole],
) -> Vec<Table> {
    let mut tables = vec![
        inputs.users.clone(),
        inputs.groups.clone(),
        inputs.user_groups.clone(),
        inputs.group_groups.clone(),
    ];

    let mut roles_table = Table::new(ROLES, ["role_id", "role_name", "description", "source"]);
    for role in roles {
        let mut row = Row::new();
        row.set("role_id", role.role_id.clone());
        row.set("role_name", role.role_name.clone());
        row.set("description", role.description.clone());
        row.set("source", role.source.clone());
        roles_table.push_row(row);
    }
    tables.push(roles_table);

    let mut user_roles_table = Table::new(USER_ROLES, ["user_id", "role_id"]);
    for assignment in user_roles {
        let mut row = Row::new();
        row.set("user_id", assignment.user_id.clone());
        row.set("role_id", assignment.role_id.clone());
        user_roles_table.push_row(row);
    }
    tables.push(user_roles_table);

    let mut group_roles_table = Table::new(GROUP_ROLES, ["group_id", "role_id"]);
    for assignment in group_roles {
        let mut row = Row::new();
        row.set("group_id", assignment.group_id.clone());
        row.set("role_id", assignment.role_id.clone());
        group_roles_table.push_row(row);
    }
    tables.push(group_roles_table);

    tables
}

/// Write all output tables and the summary report to the output directory.
pub fn write_output(
    output_dir: &Path,
    tables: &[Table],
    roles: &[RoleRecord],
) -> Result<(), PipelineError> {
    std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    for table in tables {
        write_table(output_dir, table)?;
    }

    let report_path = output_dir.join(REPORT_FILE);
    let report_content = report::build_report(tables, roles);
    std::fs::write(&report_path, report_content).map_err(|e| PipelineError::io(&report_path, e))?;

    Ok(())
}

/// Write one table as `<dir>/<name>.csv`, header row first.
fn write_table(dir: &Path, table: &Table) -> Result<(), PipelineError> {
    let path = dir.join(format!("{}.csv", table.name()));
    let mut writer = csv::Writer::from_path(&path).map_err(|e| PipelineError::Csv {
        path: path.clone(),
        source: e,
    })?;

    writer
        .write_record(table.columns())
        .map_err(|e| PipelineError::Csv {
            path: path.clone(),
            source: e,
        })?;

    for row in table.rows() {
        let record: Vec<&str> = table
            .columns()
            .iter()
            .map(|column| row.get(column).unwrap_or(""))
            .collect();
        writer.write_record(&record).map_err(|e| PipelineError::Csv {
            path: path.clone(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| PipelineError::io(&path, e))?;
    Ok(())
}
