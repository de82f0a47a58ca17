//! Table charts: the CSV itself, drawn as a grid of cells.

use crate::chart::{ChartKind, ChartSpec};
use crate::color::Rgba;
use crate::data::{parse_number, Table};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::output::{DataMark, MarkKind, RenderedFigure, Stroke, SvgCanvas, TextStyle};
use crate::plots::{draw_title, figure_rect, AXES_RECT, LABEL_FONT_SIZE};

/// Header row height as a fraction of the axes height.
pub const HEADER_ROW_HEIGHT: f64 = 0.06;
/// Data row height as a fraction of the axes height.
pub const DATA_ROW_HEIGHT: f64 = 0.05;

const EDGE_WIDTH: f64 = 1.0;

/// Columns and cells to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Selected headers, left to right.
    pub headers: Vec<String>,
    /// Data rows restricted to the selected headers.
    pub rows: Vec<Vec<String>>,
}

impl TableLayout {
    /// Total grid height as a fraction of the axes height.
    #[must_use]
    pub fn height_fraction(&self) -> f64 {
        HEADER_ROW_HEIGHT + DATA_ROW_HEIGHT * self.rows.len() as f64
    }
}

/// Table chart engine.
#[derive(Debug, Clone, Copy)]
pub struct TableChart<'a> {
    spec: &'a ChartSpec,
    x_column: Option<&'a str>,
}

impl<'a> TableChart<'a> {
    /// Engine for `spec`.
    #[must_use]
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec, x_column: None }
    }

    /// Column put back in front when the filter leaves it out. Defaults to
    /// the requested x label.
    #[must_use]
    pub fn x_column(mut self, name: &'a str) -> Self {
        self.x_column = Some(name);
        self
    }

    /// Headers shown in the table.
    ///
    /// Without a y filter every header is shown. Otherwise the headers named
    /// by the filter are kept in table order, and the x column is put back
    /// in front when the filter left it out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTableSelection`] if nothing is selected.
    pub fn select_headers(&self, table: &Table) -> Result<Vec<String>> {
        let filter = self.spec.y_column_filter();
        let mut selected: Vec<String> = if filter.is_empty() {
            table.headers().to_vec()
        } else {
            table
                .headers()
                .iter()
                .filter(|h| filter.iter().any(|f| f.trim() == h.as_str()))
                .cloned()
                .collect()
        };

        let x = self
            .x_column
            .unwrap_or_else(|| self.spec.x_label_text())
            .trim();
        if table.has_column(x) && !selected.iter().any(|h| h == x) {
            selected.insert(0, x.to_string());
        }

        if selected.is_empty() {
            return Err(Error::EmptyTableSelection);
        }
        Ok(selected)
    }

    /// Select columns and cut the rows down to them.
    ///
    /// # Errors
    ///
    /// Same as [`TableChart::select_headers`].
    pub fn layout(&self, table: &Table) -> Result<TableLayout> {
        let headers = self.select_headers(table)?;
        let indices: Vec<usize> = headers
            .iter()
            .filter_map(|h| table.column_index(h))
            .collect();
        let rows = table
            .rows()
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(TableLayout { headers, rows })
    }

    /// Lay out and draw the table.
    ///
    /// # Errors
    ///
    /// Same as [`TableChart::select_headers`].
    pub fn render(&self, table: &Table) -> Result<RenderedFigure> {
        let layout = self.layout(table)?;
        let size = self.spec.figure_size();
        let mut canvas = SvgCanvas::new(size.width_pt(), size.height_pt());
        let area = figure_rect(size, AXES_RECT);

        let column_width = area.width / layout.headers.len() as f64;
        let header_height = area.height * HEADER_ROW_HEIGHT;
        let row_height = area.height * DATA_ROW_HEIGHT;
        let top = area.center().y - area.height * layout.height_fraction() / 2.0;
        tracing::debug!(
            columns = layout.headers.len(),
            rows = layout.rows.len(),
            "table layout"
        );

        let edge = Some(Stroke::solid(Rgba::BLACK, EDGE_WIDTH));
        let header_fill = self.spec.color_palette().header();
        let mut marks = Vec::new();

        canvas.begin_group("table");
        for (col, header) in layout.headers.iter().enumerate() {
            let cell = Rect::new(area.x + col as f64 * column_width, top, column_width, header_height);
            canvas.rect(cell, header_fill, edge, None);
            canvas.text(
                cell.center(),
                header,
                TextStyle::centered(LABEL_FONT_SIZE).fill(Rgba::WHITE).bold(),
            );
        }

        for (row, cells) in layout.rows.iter().enumerate() {
            let y = top + header_height + row as f64 * row_height;
            for (col, text) in cells.iter().enumerate() {
                let cell = Rect::new(area.x + col as f64 * column_width, y, column_width, row_height);
                canvas.rect(cell, Rgba::WHITE, edge, Some(MarkKind::Cell.class()));
                canvas.text(
                    Point::new(cell.center().x, cell.center().y),
                    text,
                    TextStyle::centered(LABEL_FONT_SIZE),
                );
                marks.push(DataMark {
                    kind: MarkKind::Cell,
                    series: col,
                    row,
                    value: parse_number(text),
                });
            }
        }
        canvas.end_group();

        draw_title(&mut canvas, area, self.spec.title_text());

        Ok(RenderedFigure::new(ChartKind::Table, canvas)
            .with_marks(marks)
            .with_series_names(layout.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> Table {
        Table::from_csv_str("A,B,C\n1,2,3\n4,5,6\n").unwrap()
    }

    #[test]
    fn test_filter_reinserts_x_column() {
        let spec = ChartSpec::new(ChartKind::Table).x_label("A").y_columns(["B"]);
        let headers = TableChart::new(&spec).select_headers(&table()).unwrap();
        assert_eq!(headers, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_reinserts_resolved_x_column() {
        let spec = ChartSpec::new(ChartKind::Table).y_columns(["B"]);
        let chart = TableChart::new(&spec);
        assert_eq!(chart.select_headers(&table()).unwrap(), vec!["B"]);

        let headers = chart.x_column("A").select_headers(&table()).unwrap();
        assert_eq!(headers, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_naming_only_x_column() {
        let spec = ChartSpec::new(ChartKind::Table).y_columns(["A"]);
        let layout = TableChart::new(&spec).x_column("A").layout(&table()).unwrap();
        assert_eq!(layout.headers, vec!["A"]);
        assert_eq!(layout.rows, vec![vec!["1"], vec!["4"]]);
    }

    #[test]
    fn test_no_filter_selects_all() {
        let spec = ChartSpec::new(ChartKind::Table);
        let headers = TableChart::new(&spec).select_headers(&table()).unwrap();
        assert_eq!(headers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_filter_keeps_table_order() {
        let spec = ChartSpec::new(ChartKind::Table).x_label("B").y_columns(["C", " A"]);
        let headers = TableChart::new(&spec).select_headers(&table()).unwrap();
        assert_eq!(headers, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_empty_selection() {
        let spec = ChartSpec::new(ChartKind::Table).y_columns(["Z"]);
        let err = TableChart::new(&spec).select_headers(&table()).unwrap_err();
        assert!(matches!(err, Error::EmptyTableSelection));
    }

    #[test]
    fn test_layout_rows_follow_selection() {
        let spec = ChartSpec::new(ChartKind::Table).x_label("C").y_columns(["A"]);
        let layout = TableChart::new(&spec).layout(&table()).unwrap();
        assert_eq!(layout.headers, vec!["C", "A"]);
        assert_eq!(layout.rows[1], vec!["6", "4"]);
        assert_relative_eq!(layout.height_fraction(), 0.16);
    }

    #[test]
    fn test_render_cells() {
        let spec = ChartSpec::new(ChartKind::Table).title("Data");
        let figure = TableChart::new(&spec).render(&table()).unwrap();

        assert_eq!(figure.canvas().count_class("cell"), 6);
        assert_eq!(figure.marks().len(), 6);
        assert_eq!(figure.marks()[5].value, Some(6.0));

        let svg = figure.into_svg();
        assert!(svg.contains(r#"<g id="table">"#));
        assert!(svg.contains(r#"font-weight="bold""#));
        assert!(svg.contains(">Data</text>"));
    }
}
