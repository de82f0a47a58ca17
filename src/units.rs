//! Figure size units.
//!
//! Layout happens in inches; the canvas works in points (72 per inch).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Points per inch on the output canvas.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Pixels per inch for `px` sizes.
pub const PIXELS_PER_INCH: f64 = 96.0;

/// Unit of a user-supplied width or height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Inches.
    #[default]
    #[serde(rename = "in")]
    Inch,
    /// Centimeters.
    #[serde(rename = "cm")]
    Centimeter,
    /// Pixels at 96 DPI.
    #[serde(rename = "px")]
    Pixel,
}

impl Unit {
    /// Convert a value in this unit to inches.
    #[must_use]
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Self::Inch => value,
            Self::Centimeter => value / CM_PER_INCH,
            Self::Pixel => value / PIXELS_PER_INCH,
        }
    }

    /// Short unit suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inch => "in",
            Self::Centimeter => "cm",
            Self::Pixel => "px",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Self::Inch),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeter),
            "px" | "pixel" | "pixels" => Ok(Self::Pixel),
            _ => Err(Error::InvalidUnit(s.to_string())),
        }
    }
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    width: f64,
    height: f64,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 6.0,
        }
    }
}

impl FigureSize {
    /// Build a size from values in `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] unless both values are finite and
    /// positive.
    pub fn new(width: f64, height: f64, unit: Unit) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width: unit.to_inches(width),
            height: unit.to_inches(height),
        })
    }

    /// Width in inches.
    #[must_use]
    pub const fn width_in(&self) -> f64 {
        self.width
    }

    /// Height in inches.
    #[must_use]
    pub const fn height_in(&self) -> f64 {
        self.height
    }

    /// Width in canvas points.
    #[must_use]
    pub fn width_pt(&self) -> f64 {
        self.width * POINTS_PER_INCH
    }

    /// Height in canvas points.
    #[must_use]
    pub fn height_pt(&self) -> f64 {
        self.height * POINTS_PER_INCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cm_to_inches() {
        assert_relative_eq!(Unit::Centimeter.to_inches(10.0), 3.937_007_874, epsilon = 1e-6);
    }

    #[test]
    fn test_px_to_inches() {
        assert_relative_eq!(Unit::Pixel.to_inches(96.0), 1.0);
    }

    #[test]
    fn test_inches_unchanged() {
        assert_relative_eq!(Unit::Inch.to_inches(6.5), 6.5);
    }

    #[test]
    fn test_unit_parse() {
        assert_eq!("cm".parse::<Unit>().unwrap(), Unit::Centimeter);
        assert_eq!("PX".parse::<Unit>().unwrap(), Unit::Pixel);
        assert_eq!("in".parse::<Unit>().unwrap(), Unit::Inch);
        assert!(matches!("mm".parse::<Unit>(), Err(Error::InvalidUnit(_))));
    }

    #[test]
    fn test_figure_size_converts() {
        let size = FigureSize::new(960.0, 480.0, Unit::Pixel).unwrap();
        assert_relative_eq!(size.width_in(), 10.0);
        assert_relative_eq!(size.height_in(), 5.0);
        assert_relative_eq!(size.width_pt(), 720.0);
    }

    #[test]
    fn test_figure_size_rejects_non_positive() {
        assert!(FigureSize::new(0.0, 6.0, Unit::Inch).is_err());
        assert!(FigureSize::new(10.0, -1.0, Unit::Inch).is_err());
        assert!(FigureSize::new(f64::NAN, 6.0, Unit::Inch).is_err());
    }

    #[test]
    fn test_figure_size_default() {
        let size = FigureSize::default();
        assert_relative_eq!(size.width_in(), 10.0);
        assert_relative_eq!(size.height_in(), 6.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_conversion_scales_linearly(value in 0.001f64..10_000.0) {
            let cm = Unit::Centimeter.to_inches(value);
            let px = Unit::Pixel.to_inches(value);
            prop_assert!((cm * CM_PER_INCH - value).abs() < 1e-9 * value.max(1.0));
            prop_assert!((px * PIXELS_PER_INCH - value).abs() < 1e-9 * value.max(1.0));
        }
    }
}
