//! Gamma lookup table access
//!
//! The table is generated at compile time by build.rs with one entry per
//! 8-bit channel value.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB channel value to linear light.
#[inline]
pub fn srgb_to_linear(value: u8) -> f64 {
    SRGB_TO_LINEAR[value as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(value: u8) -> f64 {
        let c = value as f64 / 255.0;
        if c > 0.04045 {
            ((c + 0.055) / 1.055).powf(2.4)
        } else {
            c / 12.92
        }
    }

    #[test]
    fn test_srgb_to_linear_boundaries() {
        assert_eq!(srgb_to_linear(0), 0.0);
        assert!((srgb_to_linear(255) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lut_matches_formula_for_every_byte() {
        for value in 0..=255u8 {
            let diff = (srgb_to_linear(value) - exact(value)).abs();
            assert!(diff < 1e-12, "value {value}: diff {diff}");
        }
    }

    #[test]
    fn test_lut_is_monotonic() {
        for value in 1..=255u8 {
            assert!(srgb_to_linear(value) > srgb_to_linear(value - 1));
        }
    }
}
