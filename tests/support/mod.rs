#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ad2rbac::tables::csv_reader;
use ad2rbac::tables::model::{InputTables, Row, Table};

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn read_fixture_tables(fixture: &str) -> InputTables {
    csv_reader::read_input_tables(&fixture_dir(fixture)).expect("fixture tables should read")
}

pub(crate) fn fixture_config_path(fixture: &str) -> PathBuf {
    fixture_dir(fixture).join("builtin_groups.json")
}

/// Build a table from a column list and rows of cell values.
///
/// Cells are positional; an empty string reads as an absent value.
pub(crate) fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::new(name, columns.iter().copied());
    for cells in rows {
        let mut row = Row::new();
        for (column, value) in columns.iter().zip(cells.iter()) {
            row.set(column, *value);
        }
        table.push_row(row);
    }
    table
}

/// Write a table set into `dir` as one CSV file per table.
pub(crate) fn write_input_dir(dir: &Path, tables: &[&Table]) {
    for table in tables {
        let path = dir.join(format!("{}.csv", table.name()));
        let mut content = String::new();
        content.push_str(&table.columns().join(","));
        content.push('\n');
        for row in table.rows() {
            let cells: Vec<&str> = table
                .columns()
                .iter()
                .map(|column| row.get(column).unwrap_or(""))
                .collect();
            content.push_str(&cells.join(","));
            content.push('\n');
        }
        std::fs::write(path, content).expect("input table should write");
    }
}
