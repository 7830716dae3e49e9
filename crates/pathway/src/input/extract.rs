//! Reads raw tables out of the legacy store.

use rusqlite::Connection;
use tracing::info;

use crate::error::{PathwayError, Result};
use super::source::{Cell, DataTable};

/// Quote a table name as an SQL identifier.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Read the full contents of `table` in the store's natural row order.
///
/// Column names come from the table schema; cells keep the store's dynamic
/// type.
pub fn read_table(conn: &Connection, table: &str) -> Result<DataTable> {
    let read_err = |source: rusqlite::Error| PathwayError::Read {
        table: table.to_string(),
        source,
    };

    let sql = format!("SELECT * FROM {}", quote_identifier(table));
    let mut stmt = conn.prepare(&sql).map_err(read_err)?;

    let headers: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = headers.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(Cell::from))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .map_err(read_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(read_err)?;

    info!(table, rows = rows.len(), "Read {} successfully", table);
    Ok(DataTable::new(table, headers, rows))
}
