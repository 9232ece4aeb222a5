//! Cached nearest-color matching against a [`Palette`].
//!
//! [`ColorMatcher`] resolves a source pixel into two palette ids: the
//! *ideal* id (closest entry overall) and the *drawable* id (closest entry
//! that is currently available). Results are memoized per matcher instance.

use std::collections::HashMap;

use crate::color::{Oklab, Srgb};
use crate::palette::{Palette, TRANSPARENT_ID};

/// Pixels with alpha below this value are treated as transparent.
pub const OPAQUE_THRESHOLD: u8 = 100;

/// Cache keys round perceptual coordinates to this many steps per unit.
const KEY_SCALE: f64 = 1e5;

/// Result of matching one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Closest available entry, or `ideal` when nothing better can be painted
    pub drawable: u8,
    /// Closest entry regardless of availability
    pub ideal: u8,
}

impl Match {
    /// Both ids set to the transparent sentinel.
    pub const TRANSPARENT: Match = Match {
        drawable: TRANSPARENT_ID,
        ideal: TRANSPARENT_ID,
    };

    /// True when the drawable color differs from the ideal one.
    #[inline]
    pub fn is_substitution(&self) -> bool {
        self.drawable != self.ideal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ColorKey {
    Perceptual([i64; 3]),
    Exact([u8; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    color: ColorKey,
    bias: u64,
}

/// Palette matcher with a per-instance result cache.
///
/// The cache is keyed by the quantized color plus the brightness bias and is
/// cleared whenever the palette is replaced.
///
/// # Example
///
/// ```
/// use palette_match::{ColorMatcher, Palette};
///
/// let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
/// let mut matcher = ColorMatcher::new(palette);
///
/// let m = matcher.match_color([250, 250, 250, 255], 0.0, false);
/// assert_eq!(m.ideal, 2);
/// assert_eq!(m.drawable, 2);
///
/// // Transparent pixels bypass the search
/// let t = matcher.match_color([250, 250, 250, 10], 0.0, false);
/// assert_eq!(t.ideal, 0);
/// ```
#[derive(Debug, Clone)]
pub struct ColorMatcher {
    palette: Palette,
    cache: HashMap<CacheKey, Match>,
}

impl ColorMatcher {
    /// Create a matcher over `palette` with an empty cache.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            cache: HashMap::new(),
        }
    }

    /// The palette currently used for matching.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the palette, dropping every cached result.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.cache.clear();
    }

    /// Number of memoized results.
    #[inline]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Match an RGBA pixel.
    ///
    /// - alpha below [`OPAQUE_THRESHOLD`] maps to the sentinel on both ids
    /// - `bias` is the brightness bias passed to [`delta_e_2000`](crate::delta_e_2000)
    /// - `exact` keys the cache by the literal RGB value, and prefers a
    ///   palette entry whose swatch equals the pixel exactly
    pub fn match_color(&mut self, rgba: [u8; 4], bias: f64, exact: bool) -> Match {
        if rgba[3] < OPAQUE_THRESHOLD {
            return Match::TRANSPARENT;
        }

        let rgb = Srgb::new(rgba[0], rgba[1], rgba[2]);
        let lab = Oklab::from(rgb);
        let color = if exact {
            ColorKey::Exact(rgb.to_bytes())
        } else {
            ColorKey::Perceptual(perceptual_key(lab))
        };
        let key = CacheKey {
            color,
            bias: bias.to_bits(),
        };

        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }

        let result = self.search(rgb, lab, bias, exact);
        self.cache.insert(key, result);
        result
    }

    fn search(&self, rgb: Srgb, lab: Oklab, bias: f64, exact: bool) -> Match {
        if exact {
            if let Some(entry) = self.palette.paintable().find(|e| e.rgb == Some(rgb)) {
                return Match {
                    drawable: entry.id,
                    ideal: entry.id,
                };
            }
        }

        let ideal = match self.palette.find_nearest(lab, bias, false) {
            Some((id, _)) => id,
            // Palettes always carry a paintable entry
            None => return Match::TRANSPARENT,
        };

        let ideal_available = self.palette.get(ideal).is_some_and(|e| e.available);
        let drawable = if ideal_available {
            ideal
        } else {
            self.palette
                .find_nearest(lab, bias, true)
                .map_or(ideal, |(id, _)| id)
        };

        Match { drawable, ideal }
    }
}

fn perceptual_key(lab: Oklab) -> [i64; 3] {
    [
        (lab.l * KEY_SCALE).round() as i64,
        (lab.a * KEY_SCALE).round() as i64,
        (lab.b * KEY_SCALE).round() as i64,
    ]
}
