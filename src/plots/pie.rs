//! Pie charts: one pie per series, stacked vertically.
//!
//! Slot `i` occupies the figure-fraction rectangle
//! `(0.1, 0.9 - 1.1 * i, 0.8, 1.0)`, so every slot after the first lies
//! below the figure's nominal area and the canvas view box grows to cover
//! all of them. Each slot is an equal-aspect unit pie.

use crate::chart::{ChartKind, ChartSpec};
use crate::data::{series_label, Series};
use crate::error::{Diagnostics, Error, Result, Warning};
use crate::geometry::{Point, Rect};
use crate::output::{DataMark, MarkKind, RenderedFigure, SvgCanvas, TextStyle};
use crate::plots::wedge::{percentages, wedge_angles, wedge_path, Wedge};
use crate::plots::{figure_rect, text_width, Viewport, TITLE_FONT_SIZE, TITLE_PAD};

/// Left edge of every slot (figure fraction).
pub const SLOT_LEFT: f64 = 0.1;
/// Bottom edge of the first slot (figure fraction).
pub const SLOT_TOP_BOTTOM: f64 = 0.9;
/// Slot width (figure fraction).
pub const SLOT_WIDTH: f64 = 0.8;
/// Slot height (figure fraction).
pub const SLOT_HEIGHT: f64 = 1.0;
/// Vertical gap between slots (figure fraction).
pub const SLOT_GAP: f64 = 0.1;

/// Half-extent of the data square shown in a slot; the pie has radius 1.
const DATA_LIMIT: f64 = 1.25;
/// Distance of the value label from the center, relative to the radius.
const VALUE_LABEL_RADIUS: f64 = 0.6;
/// Offset of the category label below the value label, in data units.
const CATEGORY_LABEL_DROP: f64 = 0.03;
const WEDGE_FONT_SIZE: f64 = 8.0;
const HEADER_FONT_SIZE: f64 = 10.0;

/// One pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlot {
    /// Index of the series in the input.
    pub series_index: usize,
    /// Series display name.
    pub name: String,
    /// Header drawn under the pie, `None` when suppressed.
    pub header: Option<String>,
    /// Slot rectangle in figure fractions (y up).
    pub frame: Rect,
    /// Wedges in row order.
    pub wedges: Vec<Wedge>,
}

/// Geometry of a whole pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    /// Title, when non-empty.
    pub title: Option<String>,
    /// Pies of the drawable series.
    pub slots: Vec<PieSlot>,
}

/// Pie chart engine.
#[derive(Debug, Clone, Copy)]
pub struct PieChart<'a> {
    spec: &'a ChartSpec,
}

impl<'a> PieChart<'a> {
    /// Engine for `spec`.
    #[must_use]
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec }
    }

    /// Figure-fraction rectangle of slot `index`.
    #[must_use]
    pub fn slot_frame(index: usize) -> Rect {
        Rect::new(
            SLOT_LEFT,
            SLOT_TOP_BOTTOM - index as f64 * (SLOT_HEIGHT + SLOT_GAP),
            SLOT_WIDTH,
            SLOT_HEIGHT,
        )
    }

    /// Compute wedges, labels and headers.
    ///
    /// Series that cannot be drawn are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidData`] if there are no categories or no
    /// series could be drawn.
    pub fn layout(
        &self,
        categories: &[String],
        series: &[Series],
        diagnostics: &mut Diagnostics,
    ) -> Result<PieLayout> {
        if categories.is_empty() || series.is_empty() {
            return Err(Error::NoValidData(ChartKind::Pie));
        }

        let title = self.spec.title_text();
        let names: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
        let palette = self.spec.color_palette();
        let mut slots = Vec::with_capacity(series.len());

        for (index, s) in series.iter().enumerate() {
            if s.len() != categories.len() {
                diagnostics.warn(Warning::LengthMismatch {
                    series: s.name().to_string(),
                    x_len: categories.len(),
                    y_len: s.len(),
                });
                continue;
            }

            let points: Vec<(usize, f64)> = s
                .points()
                .filter(|&(row, value)| {
                    let drawable = value.is_finite() && value >= 0.0;
                    if !drawable {
                        diagnostics.warn(Warning::UndrawableValue {
                            series: s.name().to_string(),
                            row,
                            value,
                        });
                    }
                    drawable
                })
                .collect();

            let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
            let shares = percentages(&values);
            if shares.is_empty() {
                diagnostics.warn(Warning::EmptySeries {
                    series: s.name().to_string(),
                });
                continue;
            }

            let wedges = points
                .iter()
                .zip(wedge_angles(&values))
                .zip(shares)
                .enumerate()
                .map(|(i, ((&(row, value), (start_deg, end_deg)), percent))| Wedge {
                    row,
                    category: categories[row].clone(),
                    raw: s.raw_values()[row].trim().to_string(),
                    value,
                    percent,
                    start_deg,
                    end_deg,
                    color: palette.color(i),
                })
                .collect();

            let name = series_label(&names, index, "Dataset");
            let header = if categories.contains(&name) || name == title {
                diagnostics.warn(Warning::HeaderSuppressed {
                    header: name.clone(),
                });
                None
            } else {
                Some(name.clone())
            };

            slots.push(PieSlot {
                series_index: index,
                name,
                header,
                frame: Self::slot_frame(index),
                wedges,
            });
        }

        if slots.is_empty() {
            return Err(Error::NoValidData(ChartKind::Pie));
        }

        tracing::debug!(pies = slots.len(), "pie layout");
        Ok(PieLayout {
            title: (!title.trim().is_empty()).then(|| title.to_string()),
            slots,
        })
    }

    /// Lay out and draw the chart.
    ///
    /// # Errors
    ///
    /// Same as [`PieChart::layout`].
    pub fn render(
        &self,
        categories: &[String],
        series: &[Series],
        diagnostics: &mut Diagnostics,
    ) -> Result<RenderedFigure> {
        let layout = self.layout(categories, series, diagnostics)?;
        let size = self.spec.figure_size();
        let mut canvas = SvgCanvas::new(size.width_pt(), size.height_pt());
        let mut marks = Vec::new();
        let mut bounds: Option<Rect> = None;
        let data = Rect::new(-DATA_LIMIT, -DATA_LIMIT, 2.0 * DATA_LIMIT, 2.0 * DATA_LIMIT);

        for slot in &layout.slots {
            let frame = figure_rect(size, slot.frame);
            bounds = Some(bounds.map_or(frame, |b| b.union(&frame)));
            let viewport = Viewport::equal_aspect(data, frame)?;

            canvas.begin_group(format!("series-{}", slot.series_index));
            for wedge in &slot.wedges {
                canvas.path(
                    wedge_path(&viewport, Point::ORIGIN, 1.0, 0.0, wedge.start_deg, wedge.end_deg),
                    Some(wedge.color),
                    None,
                    Some(MarkKind::Wedge.class()),
                );
                marks.push(DataMark {
                    kind: MarkKind::Wedge,
                    series: slot.series_index,
                    row: wedge.row,
                    value: Some(wedge.value),
                });
            }

            let style = TextStyle::centered(WEDGE_FONT_SIZE);
            for wedge in &slot.wedges {
                let anchor = wedge.anchor(VALUE_LABEL_RADIUS);
                canvas.text(
                    viewport.map(anchor),
                    &format!("{} ({:.1}%)", wedge.raw, wedge.percent),
                    style,
                );
                canvas.text(
                    viewport.map(anchor.offset(0.0, -CATEGORY_LABEL_DROP)),
                    &wedge.category,
                    style,
                );
            }

            if let Some(header) = &slot.header {
                canvas.text(
                    Point::new(frame.center().x, frame.bottom()),
                    header,
                    TextStyle::centered(HEADER_FONT_SIZE).bold(),
                );
            }
            canvas.end_group();
        }

        let mut view = bounds.unwrap_or_else(|| canvas.view_box());
        if let Some(title) = &layout.title {
            crate::plots::draw_title(&mut canvas, view, title);
            let width = text_width(title, TITLE_FONT_SIZE);
            let band_height = TITLE_FONT_SIZE * 1.2 + TITLE_PAD;
            let band = Rect::new(
                view.center().x - width / 2.0,
                view.y - band_height,
                width,
                band_height,
            );
            view = view.union(&band);
        }
        canvas.set_view_box(view.inflate(HEADER_FONT_SIZE));

        let names = layout.slots.iter().map(|slot| slot.name.clone()).collect();
        Ok(RenderedFigure::new(ChartKind::Pie, canvas)
            .with_marks(marks)
            .with_series_names(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SanitizationMode;
    use crate::palette::Palette;
    use approx::assert_relative_eq;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn lenient(name: &str, raw: &[&str], diag: &mut Diagnostics) -> Series {
        Series::sanitize(name, cells(raw), SanitizationMode::Lenient, diag).unwrap()
    }

    #[test]
    fn test_slot_frames() {
        let first = PieChart::slot_frame(0);
        assert_eq!(first, Rect::new(0.1, 0.9, 0.8, 1.0));
        let second = PieChart::slot_frame(1);
        assert_relative_eq!(second.y, -0.2);
    }

    #[test]
    fn test_invalid_value_skipped_and_aligned() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let categories = cells(&["Apple", "Banana", "Cherry"]);
        let series = vec![lenient("Q1", &["10", "abc", "30"], &mut diag)];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        let wedges = &layout.slots[0].wedges;

        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[1].row, 2);
        assert_eq!(wedges[1].category, "Cherry");
        assert_eq!(wedges[1].raw, "30");
        let total: f64 = wedges.iter().map(|w| w.percent).sum();
        assert_relative_eq!(total, 100.0);
        assert_relative_eq!(wedges[0].percent, 25.0);
        assert!(matches!(diag.warnings()[0], Warning::SkippedValue { row: 1, .. }));
    }

    #[test]
    fn test_wedge_colors_follow_palette() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let categories: Vec<String> = (0..12).map(|i| format!("c{i}")).collect();
        let raw: Vec<String> = (1..=12).map(|i| i.to_string()).collect();
        let series = vec![Series::sanitize("S", raw, SanitizationMode::Lenient, &mut diag).unwrap()];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        let palette = Palette::default();
        for (i, wedge) in layout.slots[0].wedges.iter().enumerate() {
            assert_eq!(wedge.color, palette.color(i));
        }
        assert_eq!(layout.slots[0].wedges[10].color, palette.color(0));
    }

    #[test]
    fn test_header_suppressed_when_matching_category_or_title() {
        let spec = ChartSpec::new(ChartKind::Pie).title("Sales");
        let mut diag = Diagnostics::new();
        let categories = cells(&["Apple", "Q1"]);
        let series = vec![
            lenient("Q1", &["1", "2"], &mut diag),
            lenient("Sales", &["3", "4"], &mut diag),
            lenient("Q3", &["5", "6"], &mut diag),
        ];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        assert!(layout.slots[0].header.is_none());
        assert!(layout.slots[1].header.is_none());
        assert_eq!(layout.slots[2].header.as_deref(), Some("Q3"));
        assert_eq!(
            diag.warnings()
                .iter()
                .filter(|w| matches!(w, Warning::HeaderSuppressed { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_negative_and_empty_series() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B"]);
        let series = vec![
            lenient("Neg", &["-5", "5"], &mut diag),
            lenient("Empty", &["x", "y"], &mut diag),
            lenient("Zero", &["0", "0"], &mut diag),
        ];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        assert_eq!(layout.slots.len(), 1);
        assert_eq!(layout.slots[0].wedges.len(), 1);
        assert_relative_eq!(layout.slots[0].wedges[0].percent, 100.0);
        assert!(diag
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::UndrawableValue { value, .. } if *value == -5.0)));
        assert_eq!(
            diag.warnings()
                .iter()
                .filter(|w| matches!(w, Warning::EmptySeries { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_slot_position_keeps_series_index() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B"]);
        let series = vec![
            lenient("Bad", &["x", "y"], &mut diag),
            lenient("Good", &["1", "2"], &mut diag),
        ];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        assert_eq!(layout.slots[0].series_index, 1);
        assert_eq!(layout.slots[0].frame, PieChart::slot_frame(1));
    }

    #[test]
    fn test_length_mismatch_skips_series() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B", "C"]);
        let series = vec![
            lenient("Short", &["1", "2"], &mut diag),
            lenient("Full", &["1", "2", "3"], &mut diag),
        ];

        let layout = PieChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        assert_eq!(layout.slots.len(), 1);
        assert!(matches!(
            diag.warnings()[0],
            Warning::LengthMismatch { x_len: 3, y_len: 2, .. }
        ));
    }

    #[test]
    fn test_nothing_drawable_is_error() {
        let spec = ChartSpec::new(ChartKind::Pie);
        let mut diag = Diagnostics::new();
        let series = vec![lenient("S", &["a"], &mut diag)];
        let err = PieChart::new(&spec)
            .layout(&cells(&["A"]), &series, &mut diag)
            .unwrap_err();
        assert!(matches!(err, Error::NoValidData(ChartKind::Pie)));

        let err = PieChart::new(&spec).layout(&[], &[], &mut diag).unwrap_err();
        assert!(matches!(err, Error::NoValidData(ChartKind::Pie)));
    }

    #[test]
    fn test_render_marks_and_view_box() {
        let spec = ChartSpec::new(ChartKind::Pie).title("Fruit");
        let mut diag = Diagnostics::new();
        let categories = cells(&["Apple", "Banana"]);
        let series = vec![
            lenient("Q1", &["10", "30"], &mut diag),
            lenient("Q2", &["20", "40"], &mut diag),
        ];

        let figure = PieChart::new(&spec).render(&categories, &series, &mut diag).unwrap();
        assert_eq!(figure.marks().len(), 4);
        assert_eq!(figure.canvas().count_class("wedge"), 4);
        assert_eq!(figure.series_names(), ["Q1".to_string(), "Q2".to_string()]);

        // Two stacked slots of one figure height each, plus the gap.
        let view = figure.canvas().view_box();
        assert!(view.height > 2.1 * spec.figure_size().height_pt());

        let svg = figure.into_svg();
        assert!(svg.contains("10 (25.0%)"));
        assert!(svg.contains("40 (66.7%)"));
        assert!(svg.contains(">Fruit</text>"));
        assert!(svg.contains(r#"<g id="series-1">"#));
    }
}
