//! Cleaning and reshaping of extracted tables.

mod clean;
mod coerce;
mod contact;
mod names;
mod reorganize;

pub use clean::{CleanReport, Cleaner, Tables};
pub use coerce::{parse_date, to_date, to_float, to_integer};
pub use contact::{Contact, parse_contact};
pub use names::split_name;
pub use reorganize::{reorganize, reorganize_students};
