//! Grouped vertical bar charts.

use crate::chart::{ChartKind, ChartSpec};
use crate::color::Rgba;
use crate::data::{series_label, Series};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::output::{DataMark, MarkKind, RenderedFigure, SvgCanvas};
use crate::plots::axes::CartesianAxes;
use crate::plots::{draw_legend, draw_title, figure_rect, LegendEntry, LegendGlyph, AXES_RECT};
use crate::scale::{data_extent, pad_range};

/// Width of one bar, and the offset between series within a group.
pub const BAR_WIDTH: f64 = 0.35;

/// Fraction of the data span added around the bars.
const MARGIN: f64 = 0.05;

/// One bar in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    /// Series index.
    pub series: usize,
    /// Data row (category index).
    pub row: usize,
    /// Center x.
    pub center: f64,
    /// Bar value; the bar spans from 0 to here.
    pub value: f64,
    /// Fill color.
    pub color: Rgba,
}

impl BarRect {
    /// Rectangle covered by the bar (y up).
    #[must_use]
    pub fn data_rect(&self) -> Rect {
        Rect::new(
            self.center - BAR_WIDTH / 2.0,
            self.value.min(0.0),
            BAR_WIDTH,
            self.value.abs(),
        )
    }
}

/// Geometry of a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    /// Bars, series by series.
    pub bars: Vec<BarRect>,
    /// `(x, category)` tick under each group.
    pub ticks: Vec<(f64, String)>,
    /// Legend labels, one per series.
    pub legend: Vec<String>,
    /// Visible x range.
    pub x_range: (f64, f64),
    /// Visible y range; keeps 0 as an edge when all values share a sign.
    pub y_range: (f64, f64),
}

/// Bar chart engine.
#[derive(Debug, Clone, Copy)]
pub struct BarChart<'a> {
    spec: &'a ChartSpec,
    x_column: Option<&'a str>,
}

impl<'a> BarChart<'a> {
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

    /// Compute bar positions and axis ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidData`] when there are no categories.
    pub fn layout(&self, categories: &[String], series: &[Series]) -> Result<BarLayout> {
        if categories.is_empty() || series.is_empty() {
            return Err(Error::NoValidData(ChartKind::Bar));
        }

        let palette = self.spec.color_palette();
        let bars: Vec<BarRect> = series
            .iter()
            .enumerate()
            .flat_map(|(s, data)| {
                let color = palette.color(s);
                data.points().map(move |(row, value)| BarRect {
                    series: s,
                    row,
                    center: row as f64 + s as f64 * BAR_WIDTH,
                    value,
                    color,
                })
            })
            .collect();

        let group_offset = BAR_WIDTH * (series.len() - 1) as f64 / 2.0;
        let ticks = categories
            .iter()
            .enumerate()
            .map(|(c, label)| (c as f64 + group_offset, label.clone()))
            .collect();

        let names: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
        let legend = (0..series.len())
            .map(|s| series_label(&names, s, "Series"))
            .collect();

        let x_min = -BAR_WIDTH / 2.0;
        let x_max = (categories.len() - 1) as f64 + BAR_WIDTH * (series.len() - 1) as f64 + BAR_WIDTH / 2.0;
        let values: Vec<f64> = bars.iter().map(|b| b.value).collect();

        Ok(BarLayout {
            bars,
            ticks,
            legend,
            x_range: pad_range(x_min, x_max, MARGIN),
            y_range: zero_anchored_range(&values),
        })
    }

    /// Lay out and draw the chart.
    ///
    /// # Errors
    ///
    /// Same as [`BarChart::layout`].
    pub fn render(&self, categories: &[String], series: &[Series]) -> Result<RenderedFigure> {
        let layout = self.layout(categories, series)?;
        let size = self.spec.figure_size();
        let mut canvas = SvgCanvas::new(size.width_pt(), size.height_pt());
        let area = figure_rect(size, AXES_RECT);
        let axes = CartesianAxes::new(area, layout.x_range, layout.y_range)?;
        tracing::debug!(
            bars = layout.bars.len(),
            y_min = layout.y_range.0,
            y_max = layout.y_range.1,
            "bar layout"
        );

        axes.draw_grid(&mut canvas);

        let viewport = axes.viewport();
        let mut marks = Vec::with_capacity(layout.bars.len());
        for s in 0..layout.legend.len() {
            canvas.begin_group(format!("series-{s}"));
            for bar in layout.bars.iter().filter(|b| b.series == s) {
                let r = bar.data_rect();
                let (left, right) = (viewport.map_x(r.x), viewport.map_x(r.right()));
                let (top, bottom) = (viewport.map_y(r.bottom()), viewport.map_y(r.y));
                canvas.rect(
                    Rect::new(left, top, right - left, bottom - top),
                    bar.color,
                    None,
                    Some(MarkKind::Bar.class()),
                );
                marks.push(DataMark {
                    kind: MarkKind::Bar,
                    series: s,
                    row: bar.row,
                    value: Some(bar.value),
                });
            }
            canvas.end_group();
        }

        axes.draw_frame(
            &mut canvas,
            &layout.ticks,
            self.x_column.unwrap_or_else(|| self.spec.x_label_text()),
            self.spec.y_label_text(),
        );

        let palette = self.spec.color_palette();
        let entries: Vec<LegendEntry> = layout
            .legend
            .iter()
            .enumerate()
            .map(|(s, label)| LegendEntry {
                label: label.clone(),
                color: palette.color(s),
                glyph: LegendGlyph::Patch,
            })
            .collect();
        draw_legend(&mut canvas, area, &entries);
        draw_title(&mut canvas, area, self.spec.title_text());

        Ok(RenderedFigure::new(ChartKind::Bar, canvas)
            .with_marks(marks)
            .with_series_names(layout.legend))
    }
}

/// Value range padded by [`MARGIN`], except that a 0 edge stays at 0.
fn zero_anchored_range(values: &[f64]) -> (f64, f64) {
    let (min, max) = data_extent(values).unwrap_or((0.0, 0.0));
    let (lo, hi) = (min.min(0.0), max.max(0.0));
    let span = hi - lo;
    if span <= 0.0 {
        return (0.0, 1.0);
    }
    let lo = if lo < 0.0 { lo - span * MARGIN } else { lo };
    let hi = if hi > 0.0 { hi + span * MARGIN } else { hi };
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SanitizationMode;
    use crate::error::Diagnostics;
    use crate::palette::Palette;
    use approx::assert_relative_eq;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn strict(name: &str, raw: &[&str]) -> Series {
        Series::sanitize(name, cells(raw), SanitizationMode::Strict, &mut Diagnostics::new()).unwrap()
    }

    fn fruit() -> (Vec<String>, Vec<Series>) {
        (
            cells(&["Apple", "Banana"]),
            vec![strict("Q1", &["10", "30"]), strict("Q2", &["20", "40"])],
        )
    }

    #[test]
    fn test_grouped_positions() {
        let (categories, series) = fruit();
        let spec = ChartSpec::new(ChartKind::Bar);
        let layout = BarChart::new(&spec).layout(&categories, &series).unwrap();

        assert_eq!(layout.bars.len(), 4);
        let q2_banana = layout.bars.iter().find(|b| b.series == 1 && b.row == 1).unwrap();
        assert_relative_eq!(q2_banana.center, 1.35);
        assert_relative_eq!(q2_banana.value, 40.0);
        assert_eq!(q2_banana.color, Palette::default().color(1));

        assert_relative_eq!(layout.ticks[0].0, 0.175);
        assert_relative_eq!(layout.ticks[1].0, 1.175);
        assert_eq!(layout.ticks[1].1, "Banana");
        assert_eq!(layout.legend, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_y_range_keeps_zero() {
        let (lo, hi) = zero_anchored_range(&[10.0, 40.0]);
        assert_relative_eq!(lo, 0.0);
        assert_relative_eq!(hi, 42.0);

        let (lo, hi) = zero_anchored_range(&[-10.0, 10.0]);
        assert_relative_eq!(lo, -11.0);
        assert_relative_eq!(hi, 11.0);

        assert_eq!(zero_anchored_range(&[0.0, 0.0]), (0.0, 1.0));
    }

    #[test]
    fn test_negative_bar_rect() {
        let bar = BarRect {
            series: 0,
            row: 0,
            center: 1.0,
            value: -5.0,
            color: Rgba::BLACK,
        };
        let r = bar.data_rect();
        assert_relative_eq!(r.y, -5.0);
        assert_relative_eq!(r.height, 5.0);
        assert_relative_eq!(r.x, 0.825);
    }

    #[test]
    fn test_no_categories() {
        let spec = ChartSpec::new(ChartKind::Bar);
        let err = BarChart::new(&spec).layout(&[], &[strict("Q1", &[])]).unwrap_err();
        assert!(matches!(err, Error::NoValidData(ChartKind::Bar)));
    }

    #[test]
    fn test_render_marks_and_legend() {
        let (categories, series) = fruit();
        let spec = ChartSpec::new(ChartKind::Bar)
            .title("Sales")
            .x_label("Category")
            .y_label("Units");
        let figure = BarChart::new(&spec).render(&categories, &series).unwrap();

        assert_eq!(figure.marks().len(), 4);
        assert_eq!(figure.canvas().count_class("bar"), 4);
        assert_eq!(figure.series_marks(1).count(), 2);
        assert_eq!(figure.series_names(), &["Q1".to_string(), "Q2".to_string()]);

        let svg = figure.into_svg();
        assert!(svg.contains(r#"<g id="legend">"#));
        assert!(svg.contains(">Q1</text>"));
        assert!(svg.contains(">Q2</text>"));
        assert!(svg.contains(">Apple</text>"));
        assert!(svg.contains(">Category</text>"));
        assert!(svg.contains(">Units</text>"));
        assert!(svg.contains(">Sales</text>"));
    }

    #[test]
    fn test_caption_uses_resolved_x_column() {
        let (categories, series) = fruit();
        let spec = ChartSpec::new(ChartKind::Bar);

        let bare = BarChart::new(&spec).render(&categories, &series).unwrap();
        assert!(!bare.into_svg().contains(">Category</text>"));

        let figure = BarChart::new(&spec)
            .x_column("Category")
            .render(&categories, &series)
            .unwrap();
        assert!(figure.into_svg().contains(">Category</text>"));
    }
}
