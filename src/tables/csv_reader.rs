//! CSV ingestion of the four required input tables.
//!
//! Each table lives in `<input>/<Table>.csv`.  Headers become the table's
//! column order; cells are trimmed on ingest.  A missing file is a fatal
//! error — validation of the *contents* happens later, but a snapshot
//! without all four tables is not processable at all.

use std::path::Path;

use crate::error::PipelineError;
use crate::tables::model::{InputTables, Row, Table, GROUPS, GROUP_GROUPS, USERS, USER_GROUPS};

/// UTF-8 byte-order mark, tolerated at the start of exported files.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Read the four required tables from an input directory.
pub fn read_input_tables(input_dir: &Path) -> Result<InputTables, PipelineError> {
    Ok(InputTables {
        users: read_table(input_dir, USERS)?,
        groups: read_table(input_dir, GROUPS)?,
        user_groups: read_table(input_dir, USER_GROUPS)?,
        group_groups: read_table(input_dir, GROUP_GROUPS)?,
    })
}

/// Read a single named table from `<dir>/<name>.csv`.
pub fn read_table(dir: &Path, name: &str) -> Result<Table, PipelineError> {
    let path = dir.join(format!("{name}.csv"));
    if !path.exists() {
        return Err(PipelineError::MissingInputTable {
            table: name.to_string(),
            path,
        });
    }

    let bytes = std::fs::read(&path).map_err(|e| PipelineError::io(&path, e))?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::Csv {
            path: path.clone(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(name, headers.clone());
    for record in reader.records() {
        let record = record.map_err(|e| PipelineError::Csv {
            path: path.clone(),
            source: e,
        })?;
        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if let Some(value) = record.get(idx) {
                row.set(header, value.trim());
            }
        }
        table.push_row(row);
    }

    Ok(table)
}
