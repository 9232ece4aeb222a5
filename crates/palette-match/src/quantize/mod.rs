//! Image quantization onto a palette grid.
//!
//! [`quantize`] resamples a source bitmap to the requested width, matches
//! every cell through a [`ColorMatcher`] and returns the resulting
//! [`QuantizedGrid`] together with its [`DemandTable`].
//!
//! ```
//! use palette_match::{quantize, Bitmap, ColorMatcher, Palette, QuantizeOptions};
//!
//! let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
//! let mut matcher = ColorMatcher::new(palette);
//! let bitmap = Bitmap::filled(4, 2, [255, 255, 255, 255]);
//!
//! let (grid, demand) = quantize(&bitmap, &QuantizeOptions::new(2), &mut matcher).unwrap();
//! assert_eq!((grid.width(), grid.height()), (2, 1));
//! assert_eq!(demand.count(2), 2);
//! ```

mod bitmap;
mod grid;
mod resample;

use std::fmt;

pub use bitmap::{Bitmap, Rgba, CLEAR};
pub use grid::{DemandTable, QuantizedGrid};
pub use resample::{resample, target_height};

use crate::matcher::ColorMatcher;

/// Side length of the grid used in exact mode.
pub const EXACT_GRID_SIZE: usize = 1000;

/// Options for [`quantize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeOptions {
    /// Output width in cells. Ignored in exact mode.
    pub target_width: usize,
    /// Brightness bias forwarded to the matcher
    pub brightness: f64,
    /// Read pixels 1:1 into a fixed 1000×1000 grid, matching swatches exactly
    pub exact: bool,
}

impl QuantizeOptions {
    pub fn new(target_width: usize) -> Self {
        Self {
            target_width,
            brightness: 0.0,
            exact: false,
        }
    }

    /// Options for reading a live canvas tile.
    pub fn exact() -> Self {
        Self {
            target_width: EXACT_GRID_SIZE,
            brightness: 0.0,
            exact: true,
        }
    }

    pub fn brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }
}

/// Reasons an image cannot be quantized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// The source bitmap has no pixels
    EmptyImage { width: usize, height: usize },
    /// Requested width of zero
    ZeroTargetWidth,
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::EmptyImage { width, height } => {
                write!(f, "image has no pixels ({}x{})", width, height)
            }
            QuantizeError::ZeroTargetWidth => write!(f, "target width must be at least 1"),
        }
    }
}

impl std::error::Error for QuantizeError {}

/// Quantize `bitmap` against the matcher's palette.
///
/// The whole grid is recomputed on every call. Only the matcher cache
/// carries over between calls.
///
/// # Errors
///
/// - [`QuantizeError::EmptyImage`] when the bitmap has zero width or height
/// - [`QuantizeError::ZeroTargetWidth`] when not in exact mode and the
///   target width is zero
pub fn quantize(
    bitmap: &Bitmap,
    options: &QuantizeOptions,
    matcher: &mut ColorMatcher,
) -> Result<(QuantizedGrid, DemandTable), QuantizeError> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(QuantizeError::EmptyImage {
            width: bitmap.width(),
            height: bitmap.height(),
        });
    }

    let sampled = if options.exact {
        None
    } else {
        if options.target_width == 0 {
            return Err(QuantizeError::ZeroTargetWidth);
        }
        let height = target_height(bitmap.width(), bitmap.height(), options.target_width);
        Some(resample(bitmap, options.target_width, height))
    };

    let (width, height) = match &sampled {
        Some(s) => (s.width(), s.height()),
        None => (EXACT_GRID_SIZE, EXACT_GRID_SIZE),
    };
    let source = sampled.as_ref().unwrap_or(bitmap);

    let mut grid = QuantizedGrid::new(width, height);
    let mut demand = DemandTable::new();
    for y in 0..height {
        for x in 0..width {
            let pixel = source.pixel(x, y).unwrap_or(CLEAR);
            let m = matcher.match_color(pixel, options.brightness, options.exact);
            grid.set(x, y, m);
            demand.record(m);
        }
    }

    Ok((grid, demand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    fn bw_matcher() -> ColorMatcher {
        ColorMatcher::new(Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap())
    }

    #[test]
    fn test_zero_sized_bitmap_is_rejected() {
        let bitmap = Bitmap::filled(0, 3, CLEAR);
        let result = quantize(&bitmap, &QuantizeOptions::new(2), &mut bw_matcher());
        assert_eq!(
            result.unwrap_err(),
            QuantizeError::EmptyImage {
                width: 0,
                height: 3
            }
        );
    }

    #[test]
    fn test_zero_target_width_is_rejected() {
        let bitmap = Bitmap::filled(2, 2, CLEAR);
        let result = quantize(&bitmap, &QuantizeOptions::new(0), &mut bw_matcher());
        assert_eq!(result.unwrap_err(), QuantizeError::ZeroTargetWidth);
    }

    #[test]
    fn test_two_by_two_end_to_end() {
        let bitmap = Bitmap::new(
            2,
            2,
            vec![
                [0, 0, 0, 255],
                [255, 255, 255, 255],
                [128, 128, 128, 255],
                [0, 0, 0, 0],
            ],
        )
        .unwrap();
        let (grid, demand) = quantize(&bitmap, &QuantizeOptions::new(2), &mut bw_matcher()).unwrap();

        assert_eq!(grid.drawable_ids(), &[1, 2, 2, 0]);
        assert_eq!(demand.count(1), 1);
        assert_eq!(demand.count(2), 2);
        assert_eq!(demand.count(0), 1);
    }

    #[test]
    fn test_exact_mode_pins_grid_and_pads_transparent() {
        let bitmap = Bitmap::filled(3, 2, [255, 255, 255, 255]);
        let (grid, demand) = quantize(&bitmap, &QuantizeOptions::exact(), &mut bw_matcher()).unwrap();

        assert_eq!(grid.width(), EXACT_GRID_SIZE);
        assert_eq!(grid.height(), EXACT_GRID_SIZE);
        assert_eq!(grid.get(2, 1).unwrap().drawable, 2);
        assert_eq!(grid.get(3, 1).unwrap().drawable, 0);
        assert_eq!(demand.count(2), 6);
        assert_eq!(demand.count(0), EXACT_GRID_SIZE * EXACT_GRID_SIZE - 6);
    }

    #[test]
    fn test_brightness_changes_ideal() {
        let bitmap = Bitmap::filled(1, 1, [128, 128, 128, 255]);
        let options = QuantizeOptions::new(1).brightness(-0.5);
        let (grid, _) = quantize(&bitmap, &options, &mut bw_matcher()).unwrap();
        assert_eq!(grid.get(0, 0).unwrap().ideal, 1);
    }
}
