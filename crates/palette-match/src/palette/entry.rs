//! A single palette entry.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{Oklab, Srgb};

/// Id of the transparent sentinel entry.
///
/// The sentinel never takes part in nearest-color search. Transparent source
/// pixels map to it directly, and painting it erases a canvas pixel.
pub const TRANSPARENT_ID: u8 = 0;

/// One paintable color (or the transparent sentinel).
///
/// Ids are stable for a session; `available` may change whenever the palette
/// is refreshed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// Stable id, `0` is the transparent sentinel
    pub id: u8,
    /// Perceptual coordinates used for matching
    pub oklab: Oklab,
    /// Swatch color, when known. Used for exact matches and previews.
    pub rgb: Option<Srgb>,
    /// Whether this color can currently be painted
    pub available: bool,
}

impl PaletteEntry {
    /// Build an entry from its swatch color.
    pub fn from_srgb(id: u8, rgb: Srgb, available: bool) -> Self {
        Self {
            id,
            oklab: Oklab::from(rgb),
            rgb: Some(rgb),
            available,
        }
    }

    /// Build an entry from a `#rrggbb` swatch string.
    pub fn from_hex(id: u8, hex: &str, available: bool) -> Result<Self, PaletteError> {
        let rgb = Srgb::from_str(hex)?;
        Ok(Self::from_srgb(id, rgb, available))
    }

    /// The transparent sentinel entry.
    pub fn transparent() -> Self {
        Self {
            id: TRANSPARENT_ID,
            oklab: Oklab::new(f64::NAN, f64::NAN, f64::NAN),
            rgb: None,
            available: true,
        }
    }

    /// True for the transparent sentinel.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.id == TRANSPARENT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let entry = PaletteEntry::from_hex(5, "#ffffff", true).unwrap();
        assert_eq!(entry.id, 5);
        assert_eq!(entry.rgb, Some(Srgb::new(255, 255, 255)));
        assert!((entry.oklab.l - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_hex_invalid() {
        let result = PaletteEntry::from_hex(5, "#fffff", true);
        assert!(matches!(result, Err(PaletteError::ParseColor(_))));
    }

    #[test]
    fn test_transparent_sentinel() {
        let entry = PaletteEntry::transparent();
        assert!(entry.is_transparent());
        assert!(!entry.oklab.is_finite());
    }
}
