//! Declared shape of the normalized target store.

mod table;
mod types;

pub use table::{COURSES, ColumnDef, ForeignKey, JOBS, STUDENTS, TableDef};
pub use types::ColumnType;
