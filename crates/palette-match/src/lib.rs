//! palette-match: perceptual palette matching for pixel canvases
//!
//! This library maps arbitrary RGBA images onto a small, fixed canvas
//! palette whose colors may or may not be available to the painter.
//!
//! # Quick Start
//!
//! ```
//! use palette_match::{canvas_palette, quantize, Bitmap, ColorMatcher, Palette, QuantizeOptions};
//!
//! let palette = Palette::new(canvas_palette()).unwrap();
//! let mut matcher = ColorMatcher::new(palette);
//!
//! let bitmap = Bitmap::filled(8, 8, [250, 250, 250, 255]);
//! let (grid, demand) = quantize(&bitmap, &QuantizeOptions::new(4), &mut matcher).unwrap();
//!
//! assert_eq!(grid.len(), 16);
//! assert_eq!(demand.total(), 16);
//! ```
//!
//! # Color Spaces
//!
//! - [`Srgb`]: 8-bit gamma encoded input, swatches and previews
//! - [`LinearRgb`]: linear light, decoded through a build-time lookup table
//! - [`Oklab`]: perceptual coordinates used for every distance computation
//!
//! # Distance
//!
//! Candidates are ranked with [`delta_e_2000`], CIEDE2000 evaluated directly
//! on Oklab coordinates, minus a brightness term:
//!
//! ```text
//! d = dE2000(pixel, entry) - bias * (L_entry - L_pixel)
//! ```
//!
//! A positive bias makes lighter palette entries win, a negative one favors
//! darker entries. The result can go negative; only the ordering matters.
//!
//! # Ideal vs. Drawable
//!
//! Every match yields two ids. The *ideal* id is the nearest entry in the
//! whole palette. The *drawable* id is the nearest entry that is currently
//! available. When they differ the cell is a substitution, and the
//! [`DemandTable`] reports the ideal color under "colors to buy".
//!
//! Id `0` is the transparent sentinel: it never takes part in the search,
//! and any pixel with alpha below [`OPAQUE_THRESHOLD`] maps to it.

pub mod color;
pub mod matcher;
pub mod palette;
pub mod quantize;

#[cfg(test)]
mod domain_tests;

pub use color::{delta_e_2000, LinearRgb, Oklab, Srgb};
pub use matcher::{ColorMatcher, Match, OPAQUE_THRESHOLD};
pub use palette::{
    canvas_palette, Palette, PaletteEntry, PaletteError, ParseColorError, CANVAS_COLORS,
    MAX_PALETTE_SIZE, TRANSPARENT_ID,
};
pub use quantize::{
    quantize, target_height, Bitmap, DemandTable, QuantizeError, QuantizeOptions,
    QuantizedGrid, Rgba, CLEAR, EXACT_GRID_SIZE,
};
