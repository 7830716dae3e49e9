//! Pathway: normalizes the legacy student dataset into a typed SQLite schema.
//!
//! A run reads the raw student, job and career path tables, cleans and types
//! them, reports students whose job or career path references do not
//! resolve, rebuilds the normalized target store and writes a denormalized
//! CSV snapshot.
//!
//! # Stages
//!
//! - **Extract**: [`input::read_table`]
//! - **Clean**: [`transform::Cleaner`]
//! - **Reorganize**: [`transform::reorganize_students`]
//! - **Validate**: [`validation::violations`]
//! - **Rebuild**: [`store::rebuild`]
//! - **Export**: [`store::export_csv`]
//!
//! # Example
//!
//! ```no_run
//! use pathway::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::with_config(PipelineConfig::default());
//! let summary = pipeline.run().unwrap();
//!
//! println!("Students: {}", summary.counts.students);
//! println!("Exported rows: {}", summary.exported_rows);
//! ```

pub mod error;
pub mod input;
pub mod schema;
pub mod store;
pub mod transform;
pub mod validation;

mod pipeline;

pub use crate::pipeline::{IntegrityPolicy, Pipeline, PipelineConfig, RunSummary};
pub use error::{PathwayError, Result, Stage};
pub use input::{Cell, DataTable};
pub use schema::{ColumnType, TableDef};
pub use store::RebuildCounts;
pub use transform::{CleanReport, Tables};
pub use validation::ForeignKeyViolation;
