//! Extraction of raw tables and their in-memory representation.

mod extract;
mod source;

pub use extract::read_table;
pub use source::{Cell, DATE_FORMAT, DataTable};
