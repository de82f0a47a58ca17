//! Cartesian axes shared by the bar and line engines.

use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::output::{Baseline, Stroke, SvgCanvas, TextAnchor, TextStyle};
use crate::plots::{text_width, Viewport, LABEL_FONT_SIZE};
use crate::scale::{format_tick, nice_step, nice_ticks};

/// Approximate number of y tick intervals.
const Y_TICK_TARGET: usize = 5;
const TICK_LENGTH: f64 = 3.5;
const TICK_PAD: f64 = 3.5;
const CAPTION_PAD: f64 = 4.0;
const SPINE_WIDTH: f64 = 0.8;
const GRID_WIDTH: f64 = 0.5;

/// Axes frame, ticks, gridlines and captions around a data viewport.
#[derive(Debug, Clone)]
pub(crate) struct CartesianAxes {
    viewport: Viewport,
    y_ticks: Vec<f64>,
    y_step: f64,
}

impl CartesianAxes {
    /// Axes filling `area` with the given data ranges.
    pub(crate) fn new(area: Rect, x_range: (f64, f64), y_range: (f64, f64)) -> Result<Self> {
        let data = Rect::new(
            x_range.0,
            y_range.0,
            x_range.1 - x_range.0,
            y_range.1 - y_range.0,
        );
        let viewport = Viewport::new(data, area)?;
        Ok(Self {
            viewport,
            y_ticks: nice_ticks(y_range.0, y_range.1, Y_TICK_TARGET),
            y_step: nice_step(y_range.0, y_range.1, Y_TICK_TARGET),
        })
    }

    pub(crate) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Y tick positions in data units.
    pub(crate) fn y_ticks(&self) -> &[f64] {
        &self.y_ticks
    }

    /// Dashed horizontal gridlines at every y tick, drawn under the data.
    pub(crate) fn draw_grid(&self, canvas: &mut SvgCanvas) {
        let area = self.viewport.area();
        let stroke = Stroke::dashed(Rgba::GRID, GRID_WIDTH, 3.7, 1.6);
        canvas.begin_group("grid");
        for &tick in &self.y_ticks {
            let y = self.viewport.map_y(tick);
            canvas.line(Point::new(area.x, y), Point::new(area.right(), y), stroke);
        }
        canvas.end_group();
    }

    /// Spines, tick marks, tick labels and captions.
    ///
    /// `x_ticks` are `(data x, label)` pairs.
    pub(crate) fn draw_frame(
        &self,
        canvas: &mut SvgCanvas,
        x_ticks: &[(f64, String)],
        x_caption: &str,
        y_caption: Option<&str>,
    ) {
        let area = self.viewport.area();
        let spine = Stroke::solid(Rgba::BLACK, SPINE_WIDTH);
        canvas.begin_group("axes");
        canvas.rect(area, Rgba::TRANSPARENT, Some(spine), None);

        for (x, label) in x_ticks {
            let cx = self.viewport.map_x(*x);
            canvas.line(
                Point::new(cx, area.bottom()),
                Point::new(cx, area.bottom() + TICK_LENGTH),
                spine,
            );
            canvas.text(
                Point::new(cx, area.bottom() + TICK_LENGTH + TICK_PAD),
                label,
                TextStyle::new(LABEL_FONT_SIZE)
                    .anchor(TextAnchor::Middle)
                    .baseline(Baseline::Hanging),
            );
        }

        let mut y_label_width: f64 = 0.0;
        for &tick in &self.y_ticks {
            let cy = self.viewport.map_y(tick);
            let label = format_tick(tick, self.y_step);
            y_label_width = y_label_width.max(text_width(&label, LABEL_FONT_SIZE));
            canvas.line(
                Point::new(area.x - TICK_LENGTH, cy),
                Point::new(area.x, cy),
                spine,
            );
            canvas.text(
                Point::new(area.x - TICK_LENGTH - TICK_PAD, cy),
                &label,
                TextStyle::new(LABEL_FONT_SIZE)
                    .anchor(TextAnchor::End)
                    .baseline(Baseline::Central),
            );
        }

        if !x_caption.trim().is_empty() {
            let y = area.bottom() + TICK_LENGTH + TICK_PAD + LABEL_FONT_SIZE * 1.2 + CAPTION_PAD;
            canvas.text(
                Point::new(area.center().x, y),
                x_caption,
                TextStyle::new(LABEL_FONT_SIZE)
                    .anchor(TextAnchor::Middle)
                    .baseline(Baseline::Hanging),
            );
        }

        if let Some(caption) = y_caption.filter(|c| !c.trim().is_empty()) {
            let x = area.x - TICK_LENGTH - TICK_PAD - y_label_width - CAPTION_PAD;
            canvas.text(
                Point::new(x, area.center().y),
                caption,
                TextStyle::new(LABEL_FONT_SIZE)
                    .anchor(TextAnchor::Middle)
                    .baseline(Baseline::Bottom)
                    .rotate(-90.0),
            );
        }
        canvas.end_group();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axes() -> CartesianAxes {
        CartesianAxes::new(Rect::new(100.0, 50.0, 400.0, 200.0), (0.0, 4.0), (0.0, 10.0)).unwrap()
    }

    #[test]
    fn test_viewport_covers_area() {
        let axes = axes();
        let origin = axes.viewport().map(Point::ORIGIN);
        assert_relative_eq!(origin.x, 100.0);
        assert_relative_eq!(origin.y, 250.0);
        assert_eq!(axes.y_ticks(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_grid_lines_per_tick() {
        let axes = axes();
        let mut canvas = SvgCanvas::new(600.0, 300.0);
        axes.draw_grid(&mut canvas);
        let svg = canvas.render();
        assert_eq!(svg.matches("stroke-dasharray").count(), 6);
    }

    #[test]
    fn test_frame_labels_and_captions() {
        let axes = axes();
        let mut canvas = SvgCanvas::new(600.0, 300.0);
        let ticks = vec![(0.5, "Apple".to_string()), (1.5, "Banana".to_string())];
        axes.draw_frame(&mut canvas, &ticks, "Fruit", Some("Sales"));

        let svg = canvas.render();
        assert!(svg.contains(">Apple</text>"));
        assert!(svg.contains(">Banana</text>"));
        assert!(svg.contains(">10</text>"));
        assert!(svg.contains(">Fruit</text>"));
        assert!(svg.contains(">Sales</text>"));
        assert!(svg.contains("rotate(-90"));
    }

    #[test]
    fn test_blank_captions_skipped() {
        let axes = axes();
        let mut canvas = SvgCanvas::new(600.0, 300.0);
        axes.draw_frame(&mut canvas, &[], " ", None);
        assert!(!canvas.render().contains("rotate("));
    }
}
