//! Palette types and utilities
//!
//! This module provides the palette entry and palette types, the built-in
//! canvas palette, and error types for parsing and validation.

mod canvas;
mod entry;
mod error;
mod palette;

pub use canvas::{canvas_palette, CANVAS_COLORS};
pub use entry::{PaletteEntry, TRANSPARENT_ID};
pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, MAX_PALETTE_SIZE};
