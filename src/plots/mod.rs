//! Chart layout engines.
//!
//! One engine per [`ChartKind`]. Each computes a layout in its own data
//! coordinates (y up), then draws it into an [`SvgCanvas`] through a
//! [`Viewport`] and returns a [`RenderedFigure`].

mod axes;
mod bar;
mod donut;
mod line;
mod pie;
mod table;
mod wedge;

pub use bar::{BarChart, BarLayout, BarRect, BAR_WIDTH};
pub use donut::{
    category_colors, ring_radius, DonutChart, DonutLayout, Ring, DONUT_BASE_RADIUS,
    DONUT_RING_OFFSET, DONUT_RING_WIDTH,
};
pub use line::{LineChart, LineLayout, LinePoint, LineTrace};
pub use pie::{PieChart, PieLayout, PieSlot};
pub use table::{TableChart, TableLayout, DATA_ROW_HEIGHT, HEADER_ROW_HEIGHT};
pub use wedge::{percentages, wedge_angles, Wedge};

use crate::chart::{ChartKind, ChartSpec};
use crate::color::Rgba;
use crate::data::{ColumnSelection, SanitizationMode, Series, Table};
use crate::error::{Diagnostics, Result};
use crate::geometry::{Point, Rect};
use crate::output::{Baseline, RenderedFigure, Stroke, SvgCanvas, TextAnchor, TextStyle};
use crate::scale::{LinearScale, Scale};
use crate::units::FigureSize;

// ============================================================================
// Layout constants
// ============================================================================

/// Main axes rectangle as figure fractions (left, bottom, width, height).
pub const AXES_RECT: Rect = Rect::new(0.125, 0.11, 0.775, 0.77);

/// Title font size in points.
pub const TITLE_FONT_SIZE: f64 = 18.0;

/// Gap between the axes top and the title baseline, in points.
pub const TITLE_PAD: f64 = 6.0;

/// Tick label and legend font size in points.
pub const LABEL_FONT_SIZE: f64 = 10.0;

/// Canvas rectangle (points, y down) of a figure-fraction rectangle (y up).
#[must_use]
pub fn figure_rect(size: FigureSize, fraction: Rect) -> Rect {
    let (w, h) = (size.width_pt(), size.height_pt());
    Rect::new(
        fraction.x * w,
        (1.0 - fraction.y - fraction.height) * h,
        fraction.width * w,
        fraction.height * h,
    )
}

/// Rough rendered width of `text`, used to size legends and title bands.
#[must_use]
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}

// ============================================================================
// Viewport
// ============================================================================

/// Maps a data rectangle (y up) onto a canvas rectangle (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    x: LinearScale,
    y: LinearScale,
    area: Rect,
}

impl Viewport {
    /// Stretch `data` over `area`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ScaleDomain`] if `data` has zero width or height.
    pub fn new(data: Rect, area: Rect) -> Result<Self> {
        Ok(Self {
            x: LinearScale::new((data.x, data.right()), (area.x, area.right()))?,
            y: LinearScale::new((data.y, data.bottom()), (area.bottom(), area.y))?,
            area,
        })
    }

    /// Fit `data` into `area` with equal x and y scale, centered.
    ///
    /// # Errors
    ///
    /// Same as [`Viewport::new`].
    pub fn equal_aspect(data: Rect, area: Rect) -> Result<Self> {
        let scale = (area.width / data.width).min(area.height / data.height);
        let (w, h) = (data.width * scale, data.height * scale);
        let fitted = Rect::new(
            area.x + (area.width - w) / 2.0,
            area.y + (area.height - h) / 2.0,
            w,
            h,
        );
        Self::new(data, fitted)
    }

    /// Canvas position of a data point.
    #[must_use]
    pub fn map(&self, p: Point) -> Point {
        Point::new(self.x.scale(p.x), self.y.scale(p.y))
    }

    /// Canvas x of a data x.
    #[must_use]
    pub fn map_x(&self, x: f64) -> f64 {
        self.x.scale(x)
    }

    /// Canvas y of a data y.
    #[must_use]
    pub fn map_y(&self, y: f64) -> f64 {
        self.y.scale(y)
    }

    /// Canvas length of a horizontal data length.
    #[must_use]
    pub fn x_length(&self, dx: f64) -> f64 {
        dx * self.x.factor().abs()
    }

    /// Canvas length of a vertical data length.
    #[must_use]
    pub fn y_length(&self, dy: f64) -> f64 {
        dy * self.y.factor().abs()
    }

    /// Canvas rectangle covered by the data rectangle.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }
}

// ============================================================================
// Shared decorations
// ============================================================================

/// Draw a bold title centered above `area`. Empty titles are skipped.
pub(crate) fn draw_title(canvas: &mut SvgCanvas, area: Rect, title: &str) {
    if title.trim().is_empty() {
        return;
    }
    canvas.begin_group("title");
    canvas.text(
        Point::new(area.center().x, area.y - TITLE_PAD),
        title,
        TextStyle::new(TITLE_FONT_SIZE)
            .anchor(TextAnchor::Middle)
            .bold(),
    );
    canvas.end_group();
}

/// Swatch drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegendGlyph {
    /// Filled rectangle, as for bars.
    Patch,
    /// Short line with a round marker.
    LineMarker,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendEntry {
    pub label: String,
    pub color: Rgba,
    pub glyph: LegendGlyph,
}

const LEGEND_PAD: f64 = 5.0;
const LEGEND_ROW: f64 = LABEL_FONT_SIZE * 1.4;
const LEGEND_SWATCH: f64 = 20.0;

/// Draw a framed legend in the upper right corner of `area`.
pub(crate) fn draw_legend(canvas: &mut SvgCanvas, area: Rect, entries: &[LegendEntry]) {
    if entries.is_empty() {
        return;
    }

    let label_width = entries
        .iter()
        .map(|e| text_width(&e.label, LABEL_FONT_SIZE))
        .fold(0.0, f64::max);
    let width = LEGEND_PAD * 3.0 + LEGEND_SWATCH + label_width;
    let height = LEGEND_PAD * 2.0 + LEGEND_ROW * entries.len() as f64;
    let frame = Rect::new(area.right() - LEGEND_PAD - width, area.y + LEGEND_PAD, width, height);

    canvas.begin_group("legend");
    canvas.rect(
        frame,
        Rgba::WHITE.with_alpha(204),
        Some(Stroke::solid(Rgba::rgb(204, 204, 204), 1.0)),
        None,
    );

    for (i, entry) in entries.iter().enumerate() {
        let mid_y = frame.y + LEGEND_PAD + LEGEND_ROW * (i as f64 + 0.5);
        let swatch_x = frame.x + LEGEND_PAD;
        match entry.glyph {
            LegendGlyph::Patch => canvas.rect(
                Rect::new(swatch_x, mid_y - 3.5, LEGEND_SWATCH, 7.0),
                entry.color,
                None,
                None,
            ),
            LegendGlyph::LineMarker => {
                canvas.line(
                    Point::new(swatch_x, mid_y),
                    Point::new(swatch_x + LEGEND_SWATCH, mid_y),
                    Stroke::solid(entry.color, 1.5),
                );
                canvas.circle(
                    Point::new(swatch_x + LEGEND_SWATCH / 2.0, mid_y),
                    3.0,
                    entry.color,
                    None,
                    None,
                );
            }
        }
        canvas.text(
            Point::new(swatch_x + LEGEND_SWATCH + LEGEND_PAD, mid_y),
            &entry.label,
            TextStyle::new(LABEL_FONT_SIZE).baseline(Baseline::Central),
        );
    }
    canvas.end_group();
}

// ============================================================================
// Dispatch
// ============================================================================

/// Sanitize the selected columns and run the engine for `spec.kind()`.
///
/// # Errors
///
/// Returns the sanitization error of strict charts, or the engine's error.
pub fn render(
    spec: &ChartSpec,
    table: &Table,
    selection: &ColumnSelection,
    diagnostics: &mut Diagnostics,
) -> Result<RenderedFigure> {
    let categories = selection.x_data(table);
    let series = match SanitizationMode::for_chart(spec.kind()) {
        Some(mode) => selection
            .raw_series(table)
            .into_iter()
            .map(|(name, raw)| Series::sanitize(name, raw, mode, diagnostics))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    tracing::debug!(
        kind = %spec.kind(),
        categories = categories.len(),
        series = series.len(),
        "rendering chart"
    );

    match spec.kind() {
        ChartKind::Pie => PieChart::new(spec).render(&categories, &series, diagnostics),
        ChartKind::Donut => DonutChart::new(spec).render(&categories, &series, diagnostics),
        ChartKind::Bar => BarChart::new(spec)
            .x_column(selection.x_column())
            .render(&categories, &series),
        ChartKind::Line => LineChart::new(spec)
            .x_column(selection.x_column())
            .render(&categories, &series),
        ChartKind::Table => TableChart::new(spec)
            .x_column(selection.x_column())
            .render(table),
    }
}
