//! One chart run: load, resolve, render, export, embed.

use std::path::Path;

use crate::chart::{ChartKind, ChartSpec};
use crate::data::{ColumnSelection, TableSource};
use crate::error::{Diagnostics, Result, Warning};
use crate::output::{export_fragment, DocumentSink};
use crate::plots;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Chart type drawn.
    pub kind: ChartKind,
    /// X column used for categories.
    pub x_column: String,
    /// Names of the drawn series (columns for tables).
    pub series_names: Vec<String>,
    /// Number of data marks in the figure.
    pub mark_count: usize,
    /// Recoverable problems met along the way.
    pub warnings: Vec<Warning>,
}

/// Draw `spec` from the table at `csv_path` and append it to `sink`.
///
/// The sink is only touched once the fragment is ready, so a failing run
/// leaves it as it was.
///
/// # Errors
///
/// Returns the first error of the load, column resolution, rendering,
/// export or embed step.
pub fn run<S, D>(source: &S, csv_path: &Path, spec: &ChartSpec, sink: &mut D) -> Result<RunReport>
where
    S: TableSource + ?Sized,
    D: DocumentSink + ?Sized,
{
    let table = source.load(csv_path)?;
    let mut diagnostics = Diagnostics::new();
    let selection = match spec.kind() {
        ChartKind::Table => ColumnSelection::resolve_x(&table, spec.x_label_text(), &mut diagnostics),
        _ => ColumnSelection::resolve(
            &table,
            spec.x_label_text(),
            spec.y_column_filter(),
            &mut diagnostics,
        )?,
    };

    let figure = plots::render(spec, &table, &selection, &mut diagnostics)?;
    let series_names = figure.series_names().to_vec();
    let mark_count = figure.marks().len();

    let fragment = export_fragment(figure)?;
    sink.embed(&fragment)?;

    tracing::info!(
        kind = %spec.kind(),
        series = series_names.len(),
        marks = mark_count,
        warnings = diagnostics.warnings().len(),
        "chart embedded"
    );

    Ok(RunReport {
        kind: spec.kind(),
        x_column: selection.x_column().to_string(),
        series_names,
        mark_count,
        warnings: diagnostics.into_warnings(),
    })
}
