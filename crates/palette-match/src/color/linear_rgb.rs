//! Linear RGB color type
//!
//! Linear RGB is the space the Oklab matrices are defined on.

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB color space.
///
/// Values are in the range 0.0..=1.0 for colors decoded from 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f64,
    /// Green channel (linear light intensity)
    pub g: f64,
    /// Blue channel (linear light intensity)
    pub b: f64,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Srgb> for LinearRgb {
    /// Convert from 8-bit sRGB to linear RGB using the gamma lookup table.
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white() {
        let black = LinearRgb::from(Srgb::new(0, 0, 0));
        assert_eq!(black, LinearRgb::new(0.0, 0.0, 0.0));

        let white = LinearRgb::from(Srgb::new(255, 255, 255));
        assert!((white.r - 1.0).abs() < 1e-12);
        assert!((white.g - 1.0).abs() < 1e-12);
        assert!((white.b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mid_gray_is_darker_in_linear() {
        // sRGB 128 is about 21.6% linear light
        let gray = LinearRgb::from(Srgb::new(128, 128, 128));
        assert!((gray.r - 0.2158605).abs() < 1e-6);
    }
}
