//! Tabular data loaded from CSV.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Minimum number of columns a chartable table needs.
pub const MIN_COLUMNS: usize = 2;

/// A header row plus data rows of identical width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTable`] if there are fewer than two columns,
    /// duplicate header names, or a row whose width differs from the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.len() < MIN_COLUMNS {
            return Err(Error::MalformedTable(format!(
                "CSV file must have at least two columns (found {})",
                headers.len()
            )));
        }

        let mut seen = HashSet::with_capacity(headers.len());
        if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
            return Err(Error::MalformedTable(format!("duplicate column '{dup}'")));
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(Error::MalformedTable(format!(
                "row {} has {} fields, expected {}",
                index + 1,
                row.len(),
                headers.len()
            )));
        }

        Ok(Self { headers, rows })
    }

    /// Parse CSV text from a reader. The first record is the header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`] if the reader fails and
    /// [`Error::MalformedTable`] if the shape is unusable.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
            None => {
                return Err(Error::MalformedTable(
                    "CSV file must have at least two columns (file is empty)".to_string(),
                ))
            }
        };

        let rows = records
            .map(|record| Ok(record?.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>>>()?;

        Self::new(headers, rows)
    }

    /// Parse CSV text held in memory.
    ///
    /// # Errors
    ///
    /// Same as [`Table::from_reader`].
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), b',')
    }

    /// Column names in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the column called `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether a column called `name` exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All cells of column `name`, in row order.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].clone()).collect())
    }
}

/// Something that can turn a path into a [`Table`].
pub trait TableSource {
    /// Load the table stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    fn load(&self, path: &Path) -> Result<Table>;
}

/// Reads comma-separated (or other single-byte delimited) files.
#[derive(Debug, Clone, Copy)]
pub struct CsvSource {
    delimiter: u8,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvSource {
    /// Comma-delimited source.
    #[must_use]
    pub const fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl TableSource for CsvSource {
    fn load(&self, path: &Path) -> Result<Table> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let table = Table::from_reader(file, self.delimiter)?;
        tracing::debug!(
            path = %path.display(),
            columns = table.headers().len(),
            rows = table.row_count(),
            "loaded table"
        );
        Ok(table)
    }
}
