//! Error and warning types for trueno-chart operations.
//!
//! [`Error`] is the closed set of failures that end a run. [`Warning`] covers
//! the per-series problems a run recovers from; warnings are gathered by
//! [`Diagnostics`] and handed back to the caller in the run report.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::chart::ChartKind;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-chart operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The CSV path does not name an existing file.
    #[error("CSV not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The CSV reader rejected the input.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The table shape is unusable (too few columns, ragged rows, ...).
    #[error("malformed table: {0}")]
    MalformedTable(String),

    /// None of the requested y columns exist in the table.
    #[error("Y axis label '{requested}' not found in CSV")]
    NoValidYColumns {
        /// The y column request as the user wrote it.
        requested: String,
    },

    /// The table chart filter selected no columns.
    #[error("no valid headers found for the table")]
    EmptyTableSelection,

    /// Unknown chart type name.
    #[error("invalid chart type: '{0}' (expected pie, donut, bar, line or table)")]
    InvalidChartType(String),

    /// Unknown palette name.
    #[error("invalid color palette: '{0}' (expected default, pastel or vibrant)")]
    InvalidPalette(String),

    /// Unknown size unit.
    #[error("invalid unit: '{0}' (expected in, cm or px)")]
    InvalidUnit(String),

    /// Invalid figure dimensions.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: f64,
        /// Height value.
        height: f64,
    },

    /// A strict-mode series contains a value that is not a number.
    #[error("Error converting Y values to numbers: '{value}' in series '{series}' (row {row})")]
    NonNumericValue {
        /// Series (column) name.
        series: String,
        /// Zero-based data row index.
        row: usize,
        /// The offending cell text.
        value: String,
    },

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Scale domain error (e.g., empty span).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Nothing to draw for the chart.
    #[error("No valid data for {0} chart")]
    NoValidData(ChartKind),

    /// The serialized figure did not contain an `<svg>` element.
    #[error("unable to find valid SVG in rendered output")]
    SvgRootNotFound,

    /// The host document has no root element or is not balanced.
    #[error("malformed SVG document: {0}")]
    MalformedDocument(String),

    /// XML parsing error in the host document or the rendered figure.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}

/// A recoverable problem found while building a chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    /// The requested x column is missing; the first column is used instead.
    #[error("X Axis Label '{requested}' not found in CSV. Using default: '{fallback}'")]
    XColumnFallback {
        /// Label the user asked for.
        requested: String,
        /// Column used instead.
        fallback: String,
    },

    /// A cell could not be parsed and was left out of its series.
    #[error("'{value}' is invalid for series '{series}' (row {row}), ignoring this data")]
    SkippedValue {
        /// Series (column) name.
        series: String,
        /// Zero-based data row index.
        row: usize,
        /// The offending cell text.
        value: String,
    },

    /// A parsed value cannot be drawn as a wedge (negative or not finite).
    #[error("value {value} in series '{series}' (row {row}) cannot be drawn as a wedge, ignoring it")]
    UndrawableValue {
        /// Series (column) name.
        series: String,
        /// Zero-based data row index.
        row: usize,
        /// The parsed value.
        value: f64,
    },

    /// A series had nothing left to draw and was skipped.
    #[error("No valid data for series '{series}', skipping it")]
    EmptySeries {
        /// Series (column) name.
        series: String,
    },

    /// A series has a different length than the category column.
    #[error("The length of X data and Y data do not match for series '{series}'. X length: {x_len}, Y length: {y_len}")]
    LengthMismatch {
        /// Series (column) name.
        series: String,
        /// Number of categories.
        x_len: usize,
        /// Number of series values.
        y_len: usize,
    },

    /// A pie header was not drawn because the same text is already shown.
    #[error("Skipping header '{header}' as it matches the title or a category label")]
    HeaderSuppressed {
        /// Header text that was dropped.
        header: String,
    },
}

/// Collects warnings for one run and mirrors each one to the log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether no warning has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the collector, returning the warnings in emission order.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0.0,
            height: 6.0,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch {
            x_len: 10,
            y_len: 20,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_non_numeric_value_names_value() {
        let err = Error::NonNumericValue {
            series: "Q1".to_string(),
            row: 3,
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'abc'"));
        assert!(msg.contains("Q1"));
    }

    #[test]
    fn test_no_valid_data_names_chart() {
        let err = Error::NoValidData(ChartKind::Line);
        assert_eq!(err.to_string(), "No valid data for line chart");
    }

    #[test]
    fn test_diagnostics_keeps_order() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());
        diag.warn(Warning::EmptySeries {
            series: "a".to_string(),
        });
        diag.warn(Warning::HeaderSuppressed {
            header: "b".to_string(),
        });
        let warnings = diag.into_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], Warning::EmptySeries { .. }));
        assert!(matches!(warnings[1], Warning::HeaderSuppressed { .. }));
    }
}
