//! Color type and CSS color formatting.
//!
//! Palette entries are 24-bit `0xRRGGBB` constants; [`Rgba::to_css`] writes
//! them into SVG paint attributes.

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Light grey used for gridlines.
    pub const GRID: Self = Self::new(176, 176, 176, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create an opaque color from a 24-bit `0xRRGGBB` value.
    #[must_use]
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Format as an uppercase `#RRGGBB` hex string (alpha is ignored).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Format for an SVG paint attribute.
    ///
    /// Opaque colors use hex notation; translucent colors fall back to
    /// `rgba()`.
    #[must_use]
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
        assert_eq!(Rgba::TRANSPARENT.a, 0);
    }

    #[test]
    fn test_from_u32() {
        let c = Rgba::from_u32(0x0D6EFD);
        assert_eq!(c, Rgba::rgb(0x0D, 0x6E, 0xFD));
    }

    #[test]
    fn test_to_css_opaque_is_hex() {
        assert_eq!(Rgba::rgb(13, 110, 253).to_css(), "#0D6EFD");
    }

    #[test]
    fn test_to_css_alpha() {
        let css = Rgba::new(255, 0, 0, 128).to_css();
        assert!(css.starts_with("rgba("));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_with_alpha() {
        let semi = Rgba::WHITE.with_alpha(128);
        assert_eq!(semi.r, 255);
        assert_eq!(semi.a, 128);
    }
}
