//! Column resolution: which column is x, which columns are series.

use crate::data::table::Table;
use crate::error::{Diagnostics, Error, Result, Warning};

/// Split a comma-separated label list, trimming tokens and dropping empty ones.
#[must_use]
pub fn split_label_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Display name for series `index`: its entry in `names` when present and
/// non-blank, otherwise `"{prefix} {index + 1}"`.
#[must_use]
pub fn series_label(names: &[String], index: usize, prefix: &str) -> String {
    match names.get(index) {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ => format!("{prefix} {}", index + 1),
    }
}

/// The resolved x column and y columns of one chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    x_column: String,
    y_columns: Vec<String>,
}

impl ColumnSelection {
    /// Resolve the requested labels against the table headers.
    ///
    /// The x column is resolved as in [`ColumnSelection::resolve_x`].
    /// Requested y columns that do not exist, or that name the x column,
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidYColumns`] if no y column survives.
    pub fn resolve(
        table: &Table,
        x_label: &str,
        y_request: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let x_column = resolve_x_column(table, x_label, diagnostics);

        let y_columns: Vec<String> = if y_request.is_empty() {
            table
                .headers()
                .iter()
                .filter(|h| **h != x_column)
                .cloned()
                .collect()
        } else {
            y_request
                .iter()
                .map(|label| label.trim())
                .filter(|label| *label != x_column && table.has_column(label))
                .map(str::to_string)
                .collect()
        };

        if y_columns.is_empty() {
            return Err(Error::NoValidYColumns {
                requested: y_request.join(","),
            });
        }

        tracing::debug!(x = %x_column, y = ?y_columns, "resolved columns");
        Ok(Self {
            x_column,
            y_columns,
        })
    }

    /// Resolve only the x column, leaving the y columns empty.
    ///
    /// A missing x label falls back to the first column; a warning is
    /// recorded only when a non-empty label was requested. Tables use this
    /// and apply their own column filter.
    #[must_use]
    pub fn resolve_x(table: &Table, x_label: &str, diagnostics: &mut Diagnostics) -> Self {
        let x_column = resolve_x_column(table, x_label, diagnostics);
        tracing::debug!(x = %x_column, "resolved x column");
        Self {
            x_column,
            y_columns: Vec::new(),
        }
    }

    /// Name of the x column.
    #[must_use]
    pub fn x_column(&self) -> &str {
        &self.x_column
    }

    /// Names of the y columns, in series order.
    #[must_use]
    pub fn y_columns(&self) -> &[String] {
        &self.y_columns
    }

    /// Number of series.
    #[must_use]
    pub fn series_count(&self) -> usize {
        self.y_columns.len()
    }

    /// The x categories in row order.
    #[must_use]
    pub fn x_data(&self, table: &Table) -> Vec<String> {
        table.column(&self.x_column).unwrap_or_default()
    }

    /// One `(name, raw cells)` pair per y column, in series order.
    #[must_use]
    pub fn raw_series(&self, table: &Table) -> Vec<(String, Vec<String>)> {
        self.y_columns
            .iter()
            .map(|name| (name.clone(), table.column(name).unwrap_or_default()))
            .collect()
    }
}

fn resolve_x_column(table: &Table, x_label: &str, diagnostics: &mut Diagnostics) -> String {
    let x_label = x_label.trim();
    if table.has_column(x_label) {
        return x_label.to_string();
    }

    let fallback = table.headers()[0].clone();
    if !x_label.is_empty() {
        diagnostics.warn(Warning::XColumnFallback {
            requested: x_label.to_string(),
            fallback: fallback.clone(),
        });
    }
    fallback
}
