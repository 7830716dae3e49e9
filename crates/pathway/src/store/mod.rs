//! Target store operations: connections, schema rebuild and export.

mod connection;
mod export;
mod rebuild;

pub use connection::{close, open_source, open_target};
pub use export::{EXPORT_COLUMNS, EXPORT_QUERY, export_csv};
pub use rebuild::{RebuildCounts, rebuild};
