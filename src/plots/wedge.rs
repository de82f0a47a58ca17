//! Wedge geometry shared by the pie and donut engines.
//!
//! Angles are in degrees, counter-clockwise from the positive x axis. The
//! first wedge starts at 12 o'clock.

use crate::color::Rgba;
use crate::geometry::Point;
use crate::output::PathData;
use crate::plots::Viewport;

/// Angle of the first wedge edge.
pub const START_ANGLE: f64 = 90.0;

/// One drawn slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Data row of the value.
    pub row: usize,
    /// Category (x value) of the row.
    pub category: String,
    /// Cell text as read.
    pub raw: String,
    /// Parsed value.
    pub value: f64,
    /// Share of the series total, in percent.
    pub percent: f64,
    /// First edge angle.
    pub start_deg: f64,
    /// Second edge angle.
    pub end_deg: f64,
    /// Fill color.
    pub color: Rgba,
}

impl Wedge {
    /// Angle halfway between the edges.
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        (self.start_deg + self.end_deg) / 2.0
    }

    /// Point at `radius` along the mid angle, relative to the center.
    #[must_use]
    pub fn anchor(&self, radius: f64) -> Point {
        Point::polar(radius, self.mid_angle())
    }
}

/// Each value as a percentage of the total. Empty when the total is not
/// positive.
#[must_use]
pub fn percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return Vec::new();
    }
    values.iter().map(|v| v / total * 100.0).collect()
}

/// `(start, end)` angles of consecutive wedges, going counter-clockwise
/// from [`START_ANGLE`].
#[must_use]
pub fn wedge_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let mut start = START_ANGLE;
    percentages(values)
        .into_iter()
        .map(|pct| {
            let end = start + pct * 3.6;
            let angles = (start, end);
            start = end;
            angles
        })
        .collect()
}

/// Canvas path of a wedge (or ring segment when `inner > 0`) centered on
/// `center` in data coordinates.
pub(crate) fn wedge_path(
    viewport: &Viewport,
    center: Point,
    outer: f64,
    inner: f64,
    start_deg: f64,
    end_deg: f64,
) -> PathData {
    let at = |radius: f64, angle: f64| {
        let offset = Point::polar(radius, angle);
        viewport.map(center.offset(offset.x, offset.y))
    };
    let r_outer = viewport.x_length(outer);
    let r_inner = viewport.x_length(inner);
    let span = end_deg - start_deg;

    // Data space is y up, so counter-clockwise arcs use sweep-flag 0.
    if span >= 360.0 - 1e-9 {
        let half = start_deg + 180.0;
        let mut d = PathData::new()
            .move_to(at(outer, start_deg))
            .arc_to(r_outer, false, false, at(outer, half))
            .arc_to(r_outer, false, false, at(outer, start_deg))
            .close();
        if inner > 0.0 {
            d = d
                .move_to(at(inner, start_deg))
                .arc_to(r_inner, false, true, at(inner, half))
                .arc_to(r_inner, false, true, at(inner, start_deg))
                .close();
        }
        return d;
    }

    let large = span > 180.0;
    if inner > 0.0 {
        PathData::new()
            .move_to(at(outer, start_deg))
            .arc_to(r_outer, large, false, at(outer, end_deg))
            .line_to(at(inner, end_deg))
            .arc_to(r_inner, large, true, at(inner, start_deg))
            .close()
    } else {
        PathData::new()
            .move_to(viewport.map(center))
            .line_to(at(outer, start_deg))
            .arc_to(r_outer, large, false, at(outer, end_deg))
            .close()
    }
}
