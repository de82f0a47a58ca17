//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to canvas positions. Axis extents are
//! computed with trueno's SIMD reductions; tick positions follow the usual
//! 1-2-2.5-5 "nice number" ladder.

use trueno::Vector;

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain(
                "Domain min and max cannot be equal".to_string(),
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Range units per domain unit (negative for flipped ranges).
    #[must_use]
    pub fn factor(&self) -> f64 {
        (self.range_max - self.range_min) / (self.domain_max - self.domain_min)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Minimum and maximum of `data`, or `None` for empty or non-finite input.
///
/// Uses trueno's SIMD min/max when every value survives the trip through
/// `f32` unchanged, and an `f64` fold otherwise.
#[must_use]
pub fn data_extent(data: &[f64]) -> Option<(f64, f64)> {
    if data.is_empty() || data.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let narrowed: Vec<f32> = data.iter().map(|&v| v as f32).collect();
    let exact = narrowed.iter().zip(data).all(|(&n, &v)| f64::from(n) == v);
    if exact {
        let vec = Vector::from_vec(narrowed);
        let min = f64::from(vec.min().ok()?);
        let max = f64::from(vec.max().ok()?);
        return Some((min, max));
    }

    Some(data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    }))
}

/// Widen `(min, max)` by `fraction` of its span on both sides.
///
/// A degenerate range is widened to a unit span around its value.
#[must_use]
pub fn pad_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 0.5, max + 0.5);
    }
    (min - span * fraction, max + span * fraction)
}

/// Tick step on the 1-2-2.5-5 ladder giving about `target` intervals.
#[must_use]
pub fn nice_step(min: f64, max: f64, target: usize) -> f64 {
    let raw = (max - min) / target.max(1) as f64;
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions covering `[min, max]` at a nice step.
#[must_use]
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Vec::new();
    }

    let step = nice_step(min, max, target);
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;

    (first..=last)
        .map(|i| {
            let tick = i as f64 * step;
            // Avoid "-0" labels.
            if tick == 0.0 {
                0.0
            } else {
                tick
            }
        })
        .collect()
}

/// Format a tick value with as many decimals as `step` needs.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        let mut decimals = 0usize;
        let mut scaled = step;
        while (scaled - scaled.round()).abs() > 1e-9 && decimals < 10 {
            scaled *= 10.0;
            decimals += 1;
        }
        decimals
    };
    format!("{value:.decimals$}")
}
