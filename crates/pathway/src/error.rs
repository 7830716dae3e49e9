//! Error types for the pathway library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ColumnType;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Connect,
    Read,
    Transform,
    Integrity,
    Write,
    Export,
}

impl Stage {
    /// Get a human-readable label for the stage.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Connect => "connect",
            Stage::Read => "read",
            Stage::Transform => "transform",
            Stage::Integrity => "integrity",
            Stage::Write => "write",
            Stage::Export => "export",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Main error type for pathway operations.
#[derive(Debug, Error)]
pub enum PathwayError {
    /// The store could not be opened.
    #[error("Could not connect to '{path}': {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A source table is missing or unreadable.
    #[error("Could not read table '{table}': {source}")]
    Read {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A cleaning step hit malformed input.
    #[error("Transform error in '{table}' at row {row}, column '{column}': {message}")]
    Transform {
        table: String,
        row: usize,
        column: String,
        message: String,
    },

    /// A column required by a transformation is absent.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Integrity violations were found and the policy forbids proceeding.
    #[error("{violations} foreign key violation(s) found; rebuild blocked")]
    IntegrityBlocked { violations: usize },

    /// DDL or insertion failed in the target store.
    #[error("Write to '{table}' failed: {source}")]
    Write {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A table being written carries a column the target schema does not declare.
    #[error("Target table '{table}' declares no column '{column}'")]
    UnknownColumn { table: String, column: String },

    /// A value does not fit the declared column type.
    #[error("Type mismatch in '{table}' at row {row}, column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        table: String,
        row: usize,
        column: String,
        expected: ColumnType,
        found: &'static str,
    },

    /// The export query failed.
    #[error("Export query failed: {source}")]
    Export {
        #[source]
        source: rusqlite::Error,
    },

    /// The export file could not be written.
    #[error("Could not write export to '{path}': {source}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PathwayError {
    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            PathwayError::Connection { .. } => Stage::Connect,
            PathwayError::Read { .. } => Stage::Read,
            PathwayError::Transform { .. } | PathwayError::MissingColumn { .. } => {
                Stage::Transform
            }
            PathwayError::IntegrityBlocked { .. } => Stage::Integrity,
            PathwayError::Write { .. }
            | PathwayError::UnknownColumn { .. }
            | PathwayError::TypeMismatch { .. } => Stage::Write,
            PathwayError::Export { .. } | PathwayError::ExportIo { .. } => Stage::Export,
        }
    }
}

/// Result type alias for pathway operations.
pub type Result<T> = std::result::Result<T, PathwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        let err = PathwayError::MissingColumn {
            table: "cademycode_students".to_string(),
            column: "name".to_string(),
        };
        assert_eq!(err.stage(), Stage::Transform);
        assert_eq!(
            err.to_string(),
            "Table 'cademycode_students' has no column 'name'"
        );

        let err = PathwayError::IntegrityBlocked { violations: 2 };
        assert_eq!(err.stage(), Stage::Integrity);

        let err = PathwayError::UnknownColumn {
            table: "cademycode_courses".to_string(),
            column: "notes".to_string(),
        };
        assert_eq!(err.stage(), Stage::Write);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = PathwayError::TypeMismatch {
            table: "cademycode_courses".to_string(),
            row: 3,
            column: "hours_to_complete".to_string(),
            expected: ColumnType::Integer,
            found: "text",
        };
        assert_eq!(err.stage(), Stage::Write);
        assert!(err.to_string().contains("expected integer, found text"));
    }
}
