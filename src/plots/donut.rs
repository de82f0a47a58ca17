//! Donut charts: one concentric ring per series.

use std::collections::HashMap;

use crate::chart::{ChartKind, ChartSpec};
use crate::color::Rgba;
use crate::data::{series_label, Series};
use crate::error::{Diagnostics, Error, Result, Warning};
use crate::geometry::{Point, Rect};
use crate::output::{DataMark, MarkKind, RenderedFigure, Stroke, SvgCanvas, TextStyle};
use crate::palette::Palette;
use crate::plots::wedge::{percentages, wedge_angles, wedge_path, Wedge};
use crate::plots::{draw_title, figure_rect, Viewport, AXES_RECT};

/// Outer radius of the innermost ring.
pub const DONUT_BASE_RADIUS: f64 = 1.2;
/// Radial thickness of every ring.
pub const DONUT_RING_WIDTH: f64 = 0.55;
/// Outer radius increase from one ring to the next.
pub const DONUT_RING_OFFSET: f64 = 0.75;

const HEADER_GAP: f64 = 0.1;
const CATEGORY_LABEL_DROP: f64 = 0.2;
const VALUE_FONT_SIZE: f64 = 10.0;
const CATEGORY_FONT_SIZE: f64 = 8.0;
const HEADER_FONT_SIZE: f64 = 12.0;
/// Room kept around the outermost ring for its header.
const OUTER_MARGIN: f64 = 0.35;

/// Outer radius of ring `index`.
#[must_use]
pub fn ring_radius(index: usize) -> f64 {
    DONUT_BASE_RADIUS + index as f64 * DONUT_RING_OFFSET
}

/// Color of each distinct category, by its position in `categories`.
///
/// When a category repeats, its last position wins.
#[must_use]
pub fn category_colors<'c>(categories: &'c [String], palette: &Palette) -> HashMap<&'c str, Rgba> {
    categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.as_str(), palette.color(i)))
        .collect()
}

/// One ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    /// Index of the series in the input.
    pub series_index: usize,
    /// Header text.
    pub name: String,
    /// Outer radius.
    pub outer_radius: f64,
    /// Inner radius.
    pub inner_radius: f64,
    /// Wedges in row order.
    pub wedges: Vec<Wedge>,
}

impl Ring {
    /// Radius the value labels sit on (middle of the ring).
    #[must_use]
    pub fn label_radius(&self) -> f64 {
        self.outer_radius - DONUT_RING_WIDTH / 2.0
    }

    /// Header center, just above the ring's top.
    #[must_use]
    pub fn header_position(&self) -> Point {
        Point::new(0.0, self.outer_radius + HEADER_GAP)
    }
}

/// Geometry of a donut chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutLayout {
    /// Title, when non-empty.
    pub title: Option<String>,
    /// Rings of the drawable series, innermost first.
    pub rings: Vec<Ring>,
}

impl DonutLayout {
    /// Half-extent of the square data area needed to show every ring.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.rings
            .iter()
            .map(|ring| ring.outer_radius + OUTER_MARGIN)
            .fold(DONUT_BASE_RADIUS + OUTER_MARGIN, f64::max)
    }
}

/// Donut chart engine.
#[derive(Debug, Clone, Copy)]
pub struct DonutChart<'a> {
    spec: &'a ChartSpec,
}

impl<'a> DonutChart<'a> {
    /// Engine for `spec`.
    #[must_use]
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec }
    }

    /// Compute rings and wedges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the first series is not as
    /// long as the categories, and [`Error::NoValidData`] if nothing can be
    /// drawn.
    pub fn layout(
        &self,
        categories: &[String],
        series: &[Series],
        diagnostics: &mut Diagnostics,
    ) -> Result<DonutLayout> {
        let first = series.first().ok_or(Error::NoValidData(ChartKind::Donut))?;
        if first.len() != categories.len() {
            return Err(Error::DataLengthMismatch {
                x_len: categories.len(),
                y_len: first.len(),
            });
        }
        if categories.is_empty() {
            return Err(Error::NoValidData(ChartKind::Donut));
        }

        let palette = self.spec.color_palette();
        let colors = category_colors(categories, &palette);
        let names: Vec<String> = series.iter().map(|s| s.name().to_string()).collect();
        let mut rings = Vec::with_capacity(series.len());

        for (index, s) in series.iter().enumerate() {
            if s.len() != categories.len() {
                diagnostics.warn(Warning::LengthMismatch {
                    series: s.name().to_string(),
                    x_len: categories.len(),
                    y_len: s.len(),
                });
                continue;
            }

            let mut points = Vec::with_capacity(s.len());
            for (row, value) in s.points() {
                if value.is_finite() && value >= 0.0 {
                    points.push((row, value));
                } else {
                    diagnostics.warn(Warning::UndrawableValue {
                        series: s.name().to_string(),
                        row,
                        value,
                    });
                }
            }

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
                .map(|((&(row, value), (start_deg, end_deg)), percent)| {
                    let category = &categories[row];
                    Wedge {
                        row,
                        category: category.clone(),
                        raw: s.raw_values()[row].trim().to_string(),
                        value,
                        percent,
                        start_deg,
                        end_deg,
                        color: colors
                            .get(category.as_str())
                            .copied()
                            .unwrap_or_else(|| palette.color(row)),
                    }
                })
                .collect();

            let outer_radius = ring_radius(index);
            rings.push(Ring {
                series_index: index,
                name: series_label(&names, index, "Dataset"),
                outer_radius,
                inner_radius: outer_radius - DONUT_RING_WIDTH,
                wedges,
            });
        }

        if rings.is_empty() {
            return Err(Error::NoValidData(ChartKind::Donut));
        }

        let title = self.spec.title_text();
        Ok(DonutLayout {
            title: (!title.trim().is_empty()).then(|| title.to_string()),
            rings,
        })
    }

    /// Lay out and draw the chart.
    ///
    /// # Errors
    ///
    /// Same as [`DonutChart::layout`].
    pub fn render(
        &self,
        categories: &[String],
        series: &[Series],
        diagnostics: &mut Diagnostics,
    ) -> Result<RenderedFigure> {
        let layout = self.layout(categories, series, diagnostics)?;
        let size = self.spec.figure_size();
        let mut canvas = SvgCanvas::new(size.width_pt(), size.height_pt());
        let area = figure_rect(size, AXES_RECT);
        let extent = layout.extent();
        let viewport = Viewport::equal_aspect(
            Rect::new(-extent, -extent, 2.0 * extent, 2.0 * extent),
            area,
        )?;
        tracing::debug!(rings = layout.rings.len(), extent, "donut layout");

        let mut marks = Vec::new();
        let edge = Stroke::solid(Rgba::WHITE, 1.0);
        for ring in &layout.rings {
            canvas.begin_group(format!("series-{}", ring.series_index));
            for wedge in &ring.wedges {
                canvas.path(
                    wedge_path(
                        &viewport,
                        Point::ORIGIN,
                        ring.outer_radius,
                        ring.inner_radius,
                        wedge.start_deg,
                        wedge.end_deg,
                    ),
                    Some(wedge.color),
                    Some(edge),
                    Some(MarkKind::Wedge.class()),
                );
                marks.push(DataMark {
                    kind: MarkKind::Wedge,
                    series: ring.series_index,
                    row: wedge.row,
                    value: Some(wedge.value),
                });
            }

            for wedge in &ring.wedges {
                let anchor = wedge.anchor(ring.label_radius());
                canvas.text(
                    viewport.map(anchor),
                    &format!("{}\n({:.1}%)", wedge.value.trunc() as i64, wedge.percent),
                    TextStyle::centered(VALUE_FONT_SIZE),
                );
                canvas.text(
                    viewport.map(anchor.offset(0.0, -CATEGORY_LABEL_DROP)),
                    &wedge.category,
                    TextStyle::centered(CATEGORY_FONT_SIZE),
                );
            }

            canvas.text(
                viewport.map(ring.header_position()),
                &ring.name,
                TextStyle::centered(HEADER_FONT_SIZE),
            );
            canvas.end_group();
        }

        if let Some(title) = &layout.title {
            draw_title(&mut canvas, area, title);
        }

        let names = layout.rings.iter().map(|ring| ring.name.clone()).collect();
        Ok(RenderedFigure::new(ChartKind::Donut, canvas)
            .with_marks(marks)
            .with_series_names(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SanitizationMode;
    use approx::assert_relative_eq;

    fn cells(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn lenient(name: &str, raw: &[&str], diag: &mut Diagnostics) -> Series {
        Series::sanitize(name, cells(raw), SanitizationMode::Lenient, diag).unwrap()
    }

    #[test]
    fn test_ring_radii() {
        assert_relative_eq!(ring_radius(0), 1.2, epsilon = 1e-12);
        assert_relative_eq!(ring_radius(1), 1.95, epsilon = 1e-12);
        assert_relative_eq!(ring_radius(2) - ring_radius(1), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_category_colors_last_duplicate_wins() {
        let palette = Palette::default();
        let categories = cells(&["A", "B", "A"]);
        let colors = category_colors(&categories, &palette);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors["A"], palette.color(2));
        assert_eq!(colors["B"], palette.color(1));
    }

    #[test]
    fn test_same_category_same_color_in_every_ring() {
        let spec = ChartSpec::new(ChartKind::Donut);
        let mut diag = Diagnostics::new();
        let categories = cells(&["Apple", "Banana", "Cherry"]);
        let series = vec![
            lenient("Q1", &["1", "bad", "3"], &mut diag),
            lenient("Q2", &["4", "5", "6"], &mut diag),
        ];

        let layout = DonutChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        let cherry = |ring: &Ring| {
            ring.wedges
                .iter()
                .find(|w| w.category == "Cherry")
                .map(|w| w.color)
                .unwrap()
        };
        assert_eq!(cherry(&layout.rings[0]), cherry(&layout.rings[1]));
        assert_eq!(cherry(&layout.rings[0]), Palette::default().color(2));
    }

    #[test]
    fn test_ring_geometry() {
        let spec = ChartSpec::new(ChartKind::Donut);
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B"]);
        let series = vec![
            lenient("Q1", &["1", "3"], &mut diag),
            lenient("Q2", &["2", "2"], &mut diag),
        ];

        let layout = DonutChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        let outer = &layout.rings[1];
        assert_relative_eq!(outer.outer_radius, 1.95, epsilon = 1e-12);
        assert_relative_eq!(outer.inner_radius, 1.4, epsilon = 1e-12);
        assert_relative_eq!(outer.label_radius(), 1.675, epsilon = 1e-12);
        assert_relative_eq!(outer.header_position().y, 2.05, epsilon = 1e-12);
        assert_relative_eq!(layout.extent(), 2.3, epsilon = 1e-12);
        let total: f64 = layout.rings[0].wedges.iter().map(|w| w.percent).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let spec = ChartSpec::new(ChartKind::Donut);
        let mut diag = Diagnostics::new();
        let series = vec![lenient("Q1", &["1", "2"], &mut diag)];
        let err = DonutChart::new(&spec)
            .layout(&cells(&["A", "B", "C"]), &series, &mut diag)
            .unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch { x_len: 3, y_len: 2 }));
    }

    #[test]
    fn test_empty_ring_skipped() {
        let spec = ChartSpec::new(ChartKind::Donut);
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B"]);
        let series = vec![
            lenient("Q1", &["x", "y"], &mut diag),
            lenient("Q2", &["1", "2"], &mut diag),
        ];

        let layout = DonutChart::new(&spec).layout(&categories, &series, &mut diag).unwrap();
        assert_eq!(layout.rings.len(), 1);
        assert_eq!(layout.rings[0].series_index, 1);
        assert_relative_eq!(layout.rings[0].outer_radius, ring_radius(1));
        assert!(diag
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::EmptySeries { series } if series == "Q1")));
    }

    #[test]
    fn test_render_labels_and_edges() {
        let spec = ChartSpec::new(ChartKind::Donut).title("Share");
        let mut diag = Diagnostics::new();
        let categories = cells(&["A", "B"]);
        let series = vec![lenient("Q1", &["12.5", "37.5"], &mut diag)];

        let figure = DonutChart::new(&spec).render(&categories, &series, &mut diag).unwrap();
        assert_eq!(figure.marks().len(), 2);
        assert_eq!(figure.canvas().count_class("wedge"), 2);

        let svg = figure.into_svg();
        assert!(svg.contains(">12</tspan>"));
        assert!(svg.contains(">(25.0%)</tspan>"));
        assert!(svg.contains(r##"stroke="#FFFFFF""##));
        assert!(svg.contains(">Q1</text>"));
        assert!(svg.contains(">Share</text>"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_ring_spacing(index in 0usize..50) {
            let gap = ring_radius(index + 1) - ring_radius(index);
            prop_assert!((gap - DONUT_RING_OFFSET).abs() < 1e-9);
        }
    }
}
