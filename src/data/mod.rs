//! Data loading, column resolution and numeric sanitization.
//!
//! Turns a CSV file into a [`Table`], picks the x and y columns for a chart
//! ([`ColumnSelection`]) and converts raw cells into numeric [`Series`].

mod columns;
mod sanitize;
mod table;

pub use columns::{series_label, split_label_list, ColumnSelection};
pub use sanitize::{parse_number, SanitizationMode, Series};
pub use table::{CsvSource, Table, TableSource};
