//! Line charts over categorical x positions.
//!
//! Category `i` sits at x = `i`. Each series is a polyline with a round
//! marker and a value label at every point.

use crate::chart::{ChartKind, ChartSpec};
use crate::color::Rgba;
use crate::data::{series_label, Series};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::output::{
    Baseline, DataMark, MarkKind, RenderedFigure, Stroke, SvgCanvas, TextAnchor, TextStyle,
};
use crate::plots::axes::CartesianAxes;
use crate::plots::{draw_legend, draw_title, figure_rect, LegendEntry, LegendGlyph, AXES_RECT};
use crate::scale::{data_extent, pad_range};

const MARGIN: f64 = 0.05;
const LINE_WIDTH: f64 = 1.5;
const MARKER_RADIUS: f64 = 3.0;
const VALUE_FONT_SIZE: f64 = 8.0;
/// Gap between a marker center and its value label, in points.
const VALUE_LABEL_GAP: f64 = 2.0;

/// One plotted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
    /// Data row.
    pub row: usize,
    /// Data x (the row's category position).
    pub x: f64,
    /// Data y.
    pub value: f64,
}

impl LinePoint {
    /// Label drawn above the point.
    #[must_use]
    pub fn label(&self) -> String {
        format_value(self.value)
    }
}

/// One series.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTrace {
    /// Series index.
    pub series: usize,
    /// Legend label.
    pub name: String,
    /// Line, marker and label color.
    pub color: Rgba,
    /// Points in row order.
    pub points: Vec<LinePoint>,
}

/// Geometry of a line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Traces in series order.
    pub traces: Vec<LineTrace>,
    /// `(x, category)` tick per category.
    pub ticks: Vec<(f64, String)>,
    /// Visible x range.
    pub x_range: (f64, f64),
    /// Visible y range.
    pub y_range: (f64, f64),
}

/// Line chart engine.
#[derive(Debug, Clone, Copy)]
pub struct LineChart<'a> {
    spec: &'a ChartSpec,
    x_column: Option<&'a str>,
}

impl<'a> LineChart<'a> {
    /// Engine for `spec`.
    #[must_use]
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec, x_column: None }
    }

    /// Caption the x axis with the resolved x column.
    #[must_use]
    pub fn x_column(mut self, name: &'a str) -> Self {
        self.x_column = Some(name);
        self
    }

    /// Compute traces and axis ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidData`] when there are no categories.
    pub fn layout(&self, categories: &[String], series: &[Series]) -> Result<LineLayout> {
        if categories.is_empty() || series.is_empty() {
            return Err(Error::NoValidData(ChartKind::Line));
        }

        let palette = self.spec.color_palette();
        let names: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
        let traces: Vec<LineTrace> = series
            .iter()
            .enumerate()
            .map(|(s, data)| LineTrace {
                series: s,
                name: series_label(&names, s, "Series"),
                color: palette.color(s),
                points: data
                    .points()
                    .map(|(row, value)| LinePoint {
                        row,
                        x: row as f64,
                        value,
                    })
                    .collect(),
            })
            .collect();

        let ticks = categories
            .iter()
            .enumerate()
            .map(|(i, label)| (i as f64, label.clone()))
            .collect();

        let values: Vec<f64> = traces
            .iter()
            .flat_map(|t| t.points.iter().map(|p| p.value))
            .collect();
        let (y_min, y_max) = data_extent(&values).unwrap_or((0.0, 0.0));

        Ok(LineLayout {
            traces,
            ticks,
            x_range: pad_range(0.0, (categories.len() - 1) as f64, MARGIN),
            y_range: pad_range(y_min, y_max, MARGIN),
        })
    }

    /// Lay out and draw the chart.
    ///
    /// # Errors
    ///
    /// Same as [`LineChart::layout`].
    pub fn render(&self, categories: &[String], series: &[Series]) -> Result<RenderedFigure> {
        let layout = self.layout(categories, series)?;
        let size = self.spec.figure_size();
        let mut canvas = SvgCanvas::new(size.width_pt(), size.height_pt());
        let area = figure_rect(size, AXES_RECT);
        let axes = CartesianAxes::new(area, layout.x_range, layout.y_range)?;
        tracing::debug!(traces = layout.traces.len(), "line layout");

        axes.draw_grid(&mut canvas);

        let viewport = axes.viewport();
        let mut marks = Vec::new();
        for trace in &layout.traces {
            canvas.begin_group(format!("series-{}", trace.series));
            let positions: Vec<Point> = trace
                .points
                .iter()
                .map(|p| viewport.map(Point::new(p.x, p.value)))
                .collect();
            if positions.len() > 1 {
                canvas.polyline(&positions, Stroke::solid(trace.color, LINE_WIDTH));
            }

            for (point, &at) in trace.points.iter().zip(&positions) {
                canvas.circle(at, MARKER_RADIUS, trace.color, None, Some(MarkKind::Point.class()));
                marks.push(DataMark {
                    kind: MarkKind::Point,
                    series: trace.series,
                    row: point.row,
                    value: Some(point.value),
                });
            }

            let style = TextStyle::new(VALUE_FONT_SIZE)
                .anchor(TextAnchor::Middle)
                .baseline(Baseline::Bottom)
                .fill(trace.color);
            for (point, &at) in trace.points.iter().zip(&positions) {
                canvas.text(at.offset(0.0, -VALUE_LABEL_GAP), &point.label(), style);
            }
            canvas.end_group();
        }

        axes.draw_frame(
            &mut canvas,
            &layout.ticks,
            self.x_column.unwrap_or_else(|| self.spec.x_label_text()),
            self.spec.y_label_text(),
        );

        let entries: Vec<LegendEntry> = layout
            .traces
            .iter()
            .map(|trace| LegendEntry {
                label: trace.name.clone(),
                color: trace.color,
                glyph: LegendGlyph::LineMarker,
            })
            .collect();
        draw_legend(&mut canvas, area, &entries);
        draw_title(&mut canvas, area, self.spec.title_text());

        let names = layout.traces.into_iter().map(|trace| trace.name).collect();
        Ok(RenderedFigure::new(ChartKind::Line, canvas)
            .with_marks(marks)
            .with_series_names(names))
    }
}

/// Shortest decimal text of `value`, with `.0` kept on whole numbers.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
