//! Fixed chart color palettes.
//!
//! Every palette has exactly [`PALETTE_SIZE`] colors. Series and categories
//! are colored cyclically: index `i` always gets `colors[i % 10]`, whatever
//! the data looks like.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::Error;

/// Number of colors in every palette.
pub const PALETTE_SIZE: usize = 10;

static DEFAULT_COLORS: [Rgba; PALETTE_SIZE] = [
    Rgba::from_u32(0x0D6EFD),
    Rgba::from_u32(0x6610F2),
    Rgba::from_u32(0x6F42C1),
    Rgba::from_u32(0xD63384),
    Rgba::from_u32(0xDC3545),
    Rgba::from_u32(0xFD7E14),
    Rgba::from_u32(0xFFC107),
    Rgba::from_u32(0x4AB563),
    Rgba::from_u32(0x20C997),
    Rgba::from_u32(0x3CB1C3),
];

static PASTEL_COLORS: [Rgba; PALETTE_SIZE] = [
    Rgba::from_u32(0x81B4FE),
    Rgba::from_u32(0xAF83F8),
    Rgba::from_u32(0xB49DDF),
    Rgba::from_u32(0xEA95BF),
    Rgba::from_u32(0xED969E),
    Rgba::from_u32(0xFEBC85),
    Rgba::from_u32(0xFFDF7E),
    Rgba::from_u32(0x8FD19E),
    Rgba::from_u32(0x8BE3C9),
    Rgba::from_u32(0x86CFDA),
];

static VIBRANT_COLORS: [Rgba; PALETTE_SIZE] = [
    Rgba::from_u32(0x073984),
    Rgba::from_u32(0x35087E),
    Rgba::from_u32(0x3A2264),
    Rgba::from_u32(0x6F1B45),
    Rgba::from_u32(0x721C24),
    Rgba::from_u32(0x84420A),
    Rgba::from_u32(0x856404),
    Rgba::from_u32(0x155724),
    Rgba::from_u32(0x11694F),
    Rgba::from_u32(0x0C5460),
];

/// Palette selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    /// Saturated mid-tone colors.
    #[default]
    Default,
    /// Light tints of the default colors.
    Pastel,
    /// Dark shades of the default colors.
    Vibrant,
}

impl PaletteName {
    /// All palette names, in declaration order.
    pub const ALL: [Self; 3] = [Self::Default, Self::Pastel, Self::Vibrant];

    /// Lowercase name as used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pastel => "pastel",
            Self::Vibrant => "vibrant",
        }
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "pastel" => Ok(Self::Pastel),
            "vibrant" => Ok(Self::Vibrant),
            _ => Err(Error::InvalidPalette(s.to_string())),
        }
    }
}

/// An ordered list of ten colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    name: PaletteName,
    colors: &'static [Rgba; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(PaletteName::Default)
    }
}

impl From<PaletteName> for Palette {
    fn from(name: PaletteName) -> Self {
        Self::new(name)
    }
}

impl Palette {
    /// Look up a palette by name.
    #[must_use]
    pub fn new(name: PaletteName) -> Self {
        let colors = match name {
            PaletteName::Default => &DEFAULT_COLORS,
            PaletteName::Pastel => &PASTEL_COLORS,
            PaletteName::Vibrant => &VIBRANT_COLORS,
        };
        Self { name, colors }
    }

    /// Palette name.
    #[must_use]
    pub const fn name(&self) -> PaletteName {
        self.name
    }

    /// The ten colors in order.
    #[must_use]
    pub const fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        self.colors
    }

    /// Color for series or category `index`, cycling every ten entries.
    #[must_use]
    pub const fn color(&self, index: usize) -> Rgba {
        self.colors[index % PALETTE_SIZE]
    }

    /// Color used for table header cells.
    #[must_use]
    pub const fn header(&self) -> Rgba {
        self.colors[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_first_color() {
        let palette = Palette::default();
        assert_eq!(palette.name(), PaletteName::Default);
        assert_eq!(palette.color(0).to_hex(), "#0D6EFD");
        assert_eq!(palette.header(), palette.color(0));
    }

    #[test]
    fn test_palette_cycles() {
        let palette = Palette::new(PaletteName::Pastel);
        assert_eq!(palette.color(10), palette.color(0));
        assert_eq!(palette.color(23), palette.color(3));
        assert_eq!(palette.color(9).to_hex(), "#86CFDA");
    }

    #[test]
    fn test_vibrant_last_color() {
        let palette = Palette::new(PaletteName::Vibrant);
        assert_eq!(palette.colors()[9].to_hex(), "#0C5460");
    }

    #[test]
    fn test_palettes_are_distinct() {
        let a = Palette::new(PaletteName::Default);
        let b = Palette::new(PaletteName::Pastel);
        let c = Palette::new(PaletteName::Vibrant);
        assert_ne!(a.colors(), b.colors());
        assert_ne!(b.colors(), c.colors());
    }

    #[test]
    fn test_palette_name_parse() {
        assert_eq!("pastel".parse::<PaletteName>().unwrap(), PaletteName::Pastel);
        assert_eq!(" Vibrant ".parse::<PaletteName>().unwrap(), PaletteName::Vibrant);
        assert!(matches!(
            "neon".parse::<PaletteName>(),
            Err(Error::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_palette_name_roundtrip_display() {
        for name in PaletteName::ALL {
            assert_eq!(name.to_string().parse::<PaletteName>().unwrap(), name);
        }
    }
}
