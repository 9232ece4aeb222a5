//! Oklab perceptual color space
//!
//! Palette entries and source pixels are compared in Oklab.
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// A color in Oklab perceptual color space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 1.0 = white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness: 0.0 (black) to 1.0 (white)
    pub l: f64,
    /// Green-red axis: typically -0.5 to 0.5
    pub a: f64,
    /// Blue-yellow axis: typically -0.5 to 0.5
    pub b: f64,
}

impl Oklab {
    /// Create a new Oklab color.
    ///
    /// ```
    /// use palette_match::Oklab;
    ///
    /// let gray = Oklab::new(0.5, 0.0, 0.0);
    /// assert_eq!(gray.chroma(), 0.0);
    /// ```
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// True when all three components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Squared Euclidean distance in Oklab space.
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

impl From<LinearRgb> for Oklab {
    /// Convert from linear RGB to Oklab (2021-01-25 matrices).
    fn from(rgb: LinearRgb) -> Self {
        // Step 1: Linear sRGB to LMS (M1 matrix)
        let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
        let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
        let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;

        // Step 2: Cube root (nonlinearity)
        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        // Step 3: LMS to Lab (M2 matrix)
        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

impl From<Srgb> for Oklab {
    /// Gamma-decode, then convert to Oklab.
    ///
    /// ```
    /// use palette_match::{Oklab, Srgb};
    ///
    /// let white = Oklab::from(Srgb::new(255, 255, 255));
    /// assert!((white.l - 1.0).abs() < 1e-6);
    /// ```
    fn from(srgb: Srgb) -> Self {
        Oklab::from(LinearRgb::from(srgb))
    }
}
