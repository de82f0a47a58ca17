//! Conversion of raw cells into numeric series.

use std::collections::BTreeSet;

use crate::chart::ChartKind;
use crate::error::{Diagnostics, Error, Result, Warning};

/// Policy for cells that are not numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationMode {
    /// Skip the cell, record a warning and carry on.
    Lenient,
    /// Abort on the first bad cell.
    Strict,
}

impl SanitizationMode {
    /// Mode used by each chart kind. Tables are not sanitized.
    #[must_use]
    pub const fn for_chart(kind: ChartKind) -> Option<Self> {
        match kind {
            ChartKind::Pie | ChartKind::Donut => Some(Self::Lenient),
            ChartKind::Bar | ChartKind::Line => Some(Self::Strict),
            ChartKind::Table => None,
        }
    }
}

/// Parse one cell. Surrounding whitespace is ignored and only finite
/// numbers are accepted.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A named column of values, raw and numeric.
///
/// `raw_values` stays index-aligned with the x categories; `numeric_values`
/// holds the parsed values of the rows not listed in `skipped_indices`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    raw_values: Vec<String>,
    numeric_values: Vec<f64>,
    skipped_indices: BTreeSet<usize>,
}

impl Series {
    /// Parse `raw_values` under `mode`.
    ///
    /// # Errors
    ///
    /// In [`SanitizationMode::Strict`], returns [`Error::NonNumericValue`]
    /// for the first cell that does not parse.
    pub fn sanitize(
        name: impl Into<String>,
        raw_values: Vec<String>,
        mode: SanitizationMode,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let name = name.into();
        let mut numeric_values = Vec::with_capacity(raw_values.len());
        let mut skipped_indices = BTreeSet::new();

        for (row, raw) in raw_values.iter().enumerate() {
            match (parse_number(raw), mode) {
                (Some(value), _) => numeric_values.push(value),
                (None, SanitizationMode::Strict) => {
                    return Err(Error::NonNumericValue {
                        series: name,
                        row,
                        value: raw.clone(),
                    });
                }
                (None, SanitizationMode::Lenient) => {
                    diagnostics.warn(Warning::SkippedValue {
                        series: name.clone(),
                        row,
                        value: raw.clone(),
                    });
                    skipped_indices.insert(row);
                }
            }
        }

        Ok(Self {
            name,
            raw_values,
            numeric_values,
            skipped_indices,
        })
    }

    /// Build a series from numbers directly.
    #[must_use]
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        Self {
            name: name.into(),
            raw_values: values.iter().map(f64::to_string).collect(),
            numeric_values: values.to_vec(),
            skipped_indices: BTreeSet::new(),
        }
    }

    /// Series (column) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells as read, one per row.
    #[must_use]
    pub fn raw_values(&self) -> &[String] {
        &self.raw_values
    }

    /// Parsed values, in row order, without skipped rows.
    #[must_use]
    pub fn numeric_values(&self) -> &[f64] {
        &self.numeric_values
    }

    /// Rows whose cell did not parse.
    #[must_use]
    pub fn skipped_indices(&self) -> &BTreeSet<usize> {
        &self.skipped_indices
    }

    /// Number of rows, skipped ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_values.len()
    }

    /// Whether the series has no usable value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numeric_values.is_empty()
    }

    /// `(row, value)` for every parsed cell, so each value stays bound to
    /// its category.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.raw_values.len())
            .filter(|row| !self.skipped_indices.contains(row))
            .zip(self.numeric_values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_lenient_skips_and_warns() {
        let mut diag = Diagnostics::new();
        let series = Series::sanitize(
            "Q1",
            cells(&["10", "abc", "30"]),
            SanitizationMode::Lenient,
            &mut diag,
        )
        .unwrap();

        assert_eq!(series.numeric_values(), &[10.0, 30.0]);
        assert_eq!(series.skipped_indices().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(series.len(), 3);
        assert_eq!(
            diag.warnings(),
            [Warning::SkippedValue {
                series: "Q1".to_string(),
                row: 1,
                value: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn test_points_keep_row_alignment() {
        let mut diag = Diagnostics::new();
        let series = Series::sanitize(
            "Q1",
            cells(&["x", "20", "", "40"]),
            SanitizationMode::Lenient,
            &mut diag,
        )
        .unwrap();

        let points: Vec<_> = series.points().collect();
        assert_eq!(points, vec![(1, 20.0), (3, 40.0)]);
    }

    #[test]
    fn test_strict_aborts_with_value() {
        let mut diag = Diagnostics::new();
        let err = Series::sanitize(
            "Q2",
            cells(&["1", "2", "oops", "bad"]),
            SanitizationMode::Strict,
            &mut diag,
        )
        .unwrap_err();

        match err {
            Error::NonNumericValue { series, row, value } => {
                assert_eq!(series, "Q2");
                assert_eq!(row, 2);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(diag.is_empty());
    }

    #[test]
    fn test_all_invalid_is_empty() {
        let mut diag = Diagnostics::new();
        let series =
            Series::sanitize("A", cells(&["a", "b"]), SanitizationMode::Lenient, &mut diag)
                .unwrap();
        assert!(series.is_empty());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn test_from_values() {
        let series = Series::from_values("S", &[1.0, 2.5]);
        assert_eq!(series.raw_values(), &["1".to_string(), "2.5".to_string()]);
        assert_eq!(series.points().count(), 2);
    }
}
