//! Core type definitions for the target schema.

use std::fmt;

use crate::input::Cell;

/// Declared data type for a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    String,
    /// Date only (no time component).
    Date,
}

impl ColumnType {
    /// Check whether a cell can be stored in a column of this type.
    ///
    /// Nulls are accepted everywhere; integers widen into float columns and
    /// date columns also take already-rendered ISO text.
    pub fn accepts(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (_, Cell::Null) => true,
            (ColumnType::Integer, Cell::Integer(_)) => true,
            (ColumnType::Float, Cell::Integer(_) | Cell::Real(_)) => true,
            (ColumnType::String, Cell::Text(_)) => true,
            (ColumnType::Date, Cell::Date(_) | Cell::Text(_)) => true,
            _ => false,
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_accepts() {
        assert!(ColumnType::Integer.accepts(&Cell::Null));
        assert!(ColumnType::Integer.accepts(&Cell::Integer(4)));
        assert!(!ColumnType::Integer.accepts(&Cell::Real(4.5)));
        assert!(!ColumnType::Integer.accepts(&Cell::Text("4".to_string())));

        assert!(ColumnType::Float.accepts(&Cell::Integer(4)));
        assert!(ColumnType::Float.accepts(&Cell::Real(4.5)));

        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert!(ColumnType::Date.accepts(&Cell::Date(date)));
        assert!(!ColumnType::String.accepts(&Cell::Date(date)));
    }
}
