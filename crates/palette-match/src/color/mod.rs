//! Color types and conversion utilities
//!
//! - [`Srgb`]: 8-bit gamma-encoded colors, as found in bitmaps and swatches
//! - [`LinearRgb`]: linear light, the input of the Oklab transform
//! - [`Oklab`]: perceptual coordinates used for palette matching
//!
//! ```
//! use palette_match::{LinearRgb, Oklab, Srgb};
//!
//! let srgb = Srgb::new(128, 64, 32);
//! let linear = LinearRgb::from(srgb);
//! let lab = Oklab::from(linear);
//! assert!(lab.l > 0.0 && lab.l < 1.0);
//! ```

mod delta_e;
mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use delta_e::delta_e_2000;
pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use srgb::Srgb;
