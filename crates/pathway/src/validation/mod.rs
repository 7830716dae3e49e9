//! Validation of cleaned data before it is persisted.

mod integrity;

pub use integrity::{ForeignKeyViolation, check, violations};
