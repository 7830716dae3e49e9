//! Destructive rebuild of the normalized target schema.

use rusqlite::{Connection, Transaction, params_from_iter};
use tracing::info;

use crate::error::{PathwayError, Result};
use crate::input::DataTable;
use crate::schema::{COURSES, JOBS, STUDENTS, TableDef};

/// Row counts inserted per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildCounts {
    pub students: usize,
    pub student_jobs: usize,
    pub courses: usize,
}

/// Drop, recreate and repopulate the three normalized tables.
///
/// Everything runs in one transaction: on any failure nothing is committed
/// and the previous contents of the target store are left in place.
pub fn rebuild(
    conn: &mut Connection,
    students: &DataTable,
    courses: &DataTable,
    jobs: &DataTable,
) -> Result<RebuildCounts> {
    let tx = conn.transaction().map_err(|source| write_err(STUDENTS.name, source))?;

    // Students reference the other two tables, so they go first on drop
    // and last on create.
    for def in [&STUDENTS, &JOBS, &COURSES] {
        tx.execute_batch(&def.drop_sql())
            .map_err(|source| write_err(def.name, source))?;
    }
    for def in [&COURSES, &JOBS, &STUDENTS] {
        tx.execute_batch(&def.create_sql())
            .map_err(|source| write_err(def.name, source))?;
    }
    info!("Tables created successfully.");

    let counts = RebuildCounts {
        courses: insert_rows(&tx, &COURSES, courses)?,
        student_jobs: insert_rows(&tx, &JOBS, jobs)?,
        students: insert_rows(&tx, &STUDENTS, students)?,
    };

    tx.commit().map_err(|source| write_err(STUDENTS.name, source))?;
    info!(
        students = counts.students,
        student_jobs = counts.student_jobs,
        courses = counts.courses,
        "Database updated successfully."
    );
    Ok(counts)
}

/// Insert every row of `table` in its own column order.
fn insert_rows(tx: &Transaction<'_>, def: &TableDef, table: &DataTable) -> Result<usize> {
    let columns = table
        .headers
        .iter()
        .map(|h| {
            def.column(h).ok_or_else(|| PathwayError::UnknownColumn {
                table: def.name.to_string(),
                column: h.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut stmt = tx
        .prepare(&def.insert_sql(&table.headers))
        .map_err(|source| write_err(def.name, source))?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (column, cell) in columns.iter().zip(row) {
            let null_key = column.primary_key && cell.is_null();
            if null_key || !column.column_type.accepts(cell) {
                return Err(PathwayError::TypeMismatch {
                    table: def.name.to_string(),
                    row: row_idx,
                    column: column.name.to_string(),
                    expected: column.column_type,
                    found: cell.type_name(),
                });
            }
        }
        stmt.execute(params_from_iter(row.iter()))
            .map_err(|source| write_err(def.name, source))?;
    }

    Ok(table.row_count())
}

fn write_err(table: &str, source: rusqlite::Error) -> PathwayError {
    PathwayError::Write {
        table: table.to_string(),
        source,
    }
}
