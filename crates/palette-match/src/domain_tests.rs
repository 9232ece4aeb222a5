//! Regression tests for the matching pipeline as a whole.
//!
//! Each test names the class of bug it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::color::{Oklab, Srgb};
    use crate::matcher::ColorMatcher;
    use crate::palette::{canvas_palette, Palette, PaletteEntry, CANVAS_COLORS};
    use crate::quantize::{quantize, Bitmap, QuantizeOptions};

    fn canvas_id(rgb: Srgb) -> u8 {
        CANVAS_COLORS
            .iter()
            .position(|&c| c == rgb)
            .map(|i| i as u8 + 1)
            .unwrap()
    }

    /// If this breaks, the bias sign is inverted: a positive brightness must
    /// push mid-tones toward the lighter candidate, never the darker one.
    #[test]
    fn test_bias_direction() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let mut matcher = ColorMatcher::new(palette);
        let gray = [100, 100, 100, 255];

        let dark = matcher.match_color(gray, -1.0, false);
        let light = matcher.match_color(gray, 1.0, false);
        assert_eq!(dark.ideal, 1, "negative bias should pick black");
        assert_eq!(light.ideal, 2, "positive bias should pick white");
    }

    /// If this breaks, distance is being computed on gamma encoded values
    /// instead of Oklab: sRGB 128 is perceptually closer to white than to
    /// black, although it sits at the byte midpoint.
    #[test]
    fn test_mid_gray_is_perceptually_light() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let mut matcher = ColorMatcher::new(palette);
        assert_eq!(matcher.match_color([128, 128, 128, 255], 0.0, false).ideal, 2);
        assert!(Oklab::from(Srgb::new(128, 128, 128)).l > 0.5);
    }

    /// If this breaks, the matcher hands out an unavailable color as the
    /// drawable id, which the painter then fails to select.
    #[test]
    fn test_drawable_is_always_available() {
        let mut entries = canvas_palette();
        for entry in entries.iter_mut().skip(1) {
            entry.available = entry.id <= 8;
        }
        let palette = Palette::new(entries).unwrap();
        let mut matcher = ColorMatcher::new(palette.clone());

        for r in (0..=255u16).step_by(51) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(85) {
                    let m = matcher.match_color([r as u8, g as u8, b as u8, 255], 0.0, false);
                    assert!(
                        palette.get(m.drawable).unwrap().available,
                        "drawable {} for ({}, {}, {}) is not available",
                        m.drawable,
                        r,
                        g,
                        b
                    );
                }
            }
        }
    }

    /// If this breaks, the cache returns results computed for another
    /// palette, so availability refreshes are silently ignored.
    #[test]
    fn test_cached_and_fresh_results_agree() {
        let mut cached = ColorMatcher::new(Palette::new(canvas_palette()).unwrap());
        let pixels: Vec<[u8; 4]> = (0..200u16)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8, 255])
            .collect();

        for p in &pixels {
            cached.match_color(*p, 0.0, false);
        }
        for p in &pixels {
            let mut fresh = ColorMatcher::new(Palette::new(canvas_palette()).unwrap());
            assert_eq!(cached.match_color(*p, 0.0, false), fresh.match_color(*p, 0.0, false));
        }
    }

    /// If this breaks, reading a live tile misidentifies canvas colors that
    /// are perceptually close to each other.
    #[test]
    fn test_exact_tile_read_recovers_ids() {
        let palette = Palette::new(canvas_palette()).unwrap();
        let mut matcher = ColorMatcher::new(palette);
        let pixels: Vec<[u8; 4]> = CANVAS_COLORS
            .iter()
            .map(|c| {
                let [r, g, b] = c.to_bytes();
                [r, g, b, 255]
            })
            .collect();
        let bitmap = Bitmap::new(pixels.len(), 1, pixels).unwrap();

        let (grid, _) = quantize(&bitmap, &QuantizeOptions::exact(), &mut matcher).unwrap();
        for (x, color) in CANVAS_COLORS.iter().enumerate() {
            assert_eq!(grid.get(x, 0).unwrap().drawable, canvas_id(*color));
        }
    }

    /// If this breaks, shrinking lets fully transparent pixels tint the
    /// average, or keeps mostly transparent areas opaque.
    #[test]
    fn test_shrink_keeps_transparency_semantics() {
        let red = [237, 28, 36, 255];
        let clear = [0, 0, 0, 0];
        // left 2x2 block mostly clear, right block solid red
        let bitmap = Bitmap::new(4, 2, vec![red, clear, red, red, clear, clear, red, red]).unwrap();
        let palette = Palette::new(vec![
            PaletteEntry::transparent(),
            PaletteEntry::from_srgb(1, Srgb::new(0, 0, 0), true),
            PaletteEntry::from_srgb(2, Srgb::new(237, 28, 36), true),
        ])
        .unwrap();
        let mut matcher = ColorMatcher::new(palette);

        let (grid, demand) = quantize(&bitmap, &QuantizeOptions::new(2), &mut matcher).unwrap();
        assert_eq!(grid.drawable_ids(), &[0, 2]);
        assert_eq!(demand.count(0), 1);
    }
}
