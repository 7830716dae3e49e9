//! Projection of cleaned tables onto the target schema's column order.

use tracing::info;

use crate::error::Result;
use crate::input::DataTable;
use crate::schema::{STUDENTS, TableDef};

/// Project `table` onto the canonical column order of `def`.
///
/// Fails with `MissingColumn` if any declared column is absent; extra
/// columns are dropped.
pub fn reorganize(table: &DataTable, def: &TableDef) -> Result<DataTable> {
    let projected = table.project(&def.column_names())?;
    info!(table = def.name, "Reorganized {} into canonical column order", def.name);
    Ok(projected)
}

/// Project the cleaned student table onto its canonical column order.
pub fn reorganize_students(students: &DataTable) -> Result<DataTable> {
    reorganize(students, &STUDENTS)
}
