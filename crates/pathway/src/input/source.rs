//! In-memory tabular data read from a store.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use indexmap::IndexSet;
use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};

use crate::error::{PathwayError, Result};

/// Storage format for dates written to the target store and the export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single dynamically typed value.
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Check if the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The integer value, if this is an integer cell.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The string value, if this is a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Integer(_) => "integer",
            Cell::Real(_) => "real",
            Cell::Text(_) => "text",
            Cell::Date(_) => "date",
        }
    }

    /// Render the cell for a delimited file. Nulls become empty fields.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Integer(i) => i.to_string(),
            Cell::Real(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
            Cell::Real(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Cell::Null,
            ValueRef::Integer(i) => Cell::Integer(i),
            ValueRef::Real(f) => Cell::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Cell::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Real(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

// Reals compare by bit pattern so that rows hash consistently (NaN == NaN).
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Integer(a), Cell::Integer(b)) => a == b,
            (Cell::Real(a), Cell::Real(b)) => a.to_bits() == b.to_bits(),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Integer(i) => i.hash(state),
            Cell::Real(f) => f.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Date(d) => d.hash(state),
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Cell::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Cell::Date(d) => ToSqlOutput::Owned(Value::Text(d.format(DATE_FORMAT).to_string())),
        })
    }
}

/// Represents a table held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Name of the table this data came from.
    pub name: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column by name, failing if it is absent.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PathwayError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Cell::Null))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    ///
    /// Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let unique: IndexSet<Vec<Cell>> = self.rows.drain(..).collect();
        self.rows = unique.into_iter().collect();
        before - self.rows.len()
    }

    /// Replace every value of a column in place.
    pub fn map_column<F>(&mut self, index: usize, mut f: F) -> Result<()>
    where
        F: FnMut(usize, Cell) -> Result<Cell>,
    {
        for (row_idx, row) in self.rows.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(index) {
                let value = std::mem::replace(cell, Cell::Null);
                *cell = f(row_idx, value)?;
            }
        }
        Ok(())
    }

    /// Remove a column by name, returning its values.
    pub fn drop_column(&mut self, name: &str) -> Result<Vec<Cell>> {
        let index = self.require_column(name)?;
        self.headers.remove(index);
        Ok(self
            .rows
            .iter_mut()
            .map(|row| {
                if index < row.len() {
                    row.remove(index)
                } else {
                    Cell::Null
                }
            })
            .collect())
    }

    /// Append a column. `values` must hold one cell per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Build a new table holding only `columns`, in that order.
    pub fn project(&self, columns: &[&str]) -> Result<DataTable> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or(Cell::Null))
                    .collect()
            })
            .collect();

        Ok(DataTable::new(
            self.name.clone(),
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        ))
    }
}
