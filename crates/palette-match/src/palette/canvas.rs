//! The built-in canvas palette.
//!
//! Id 0 is the transparent sentinel; ids 1..=63 are the paintable swatches in
//! the order the canvas lists them.

use super::entry::PaletteEntry;
use crate::color::Srgb;

/// Swatch colors for ids 1..=63 (index `i` holds id `i + 1`).
pub const CANVAS_COLORS: [Srgb; 63] = [
    Srgb::new(0, 0, 0),
    Srgb::new(60, 60, 60),
    Srgb::new(120, 120, 120),
    Srgb::new(210, 210, 210),
    Srgb::new(255, 255, 255),
    Srgb::new(96, 0, 24),
    Srgb::new(237, 28, 36),
    Srgb::new(255, 127, 39),
    Srgb::new(246, 170, 9),
    Srgb::new(249, 221, 59),
    Srgb::new(255, 250, 188),
    Srgb::new(14, 185, 104),
    Srgb::new(19, 230, 123),
    Srgb::new(135, 255, 94),
    Srgb::new(12, 129, 110),
    Srgb::new(16, 174, 166),
    Srgb::new(19, 225, 190),
    Srgb::new(40, 80, 158),
    Srgb::new(64, 147, 228),
    Srgb::new(96, 247, 242),
    Srgb::new(107, 80, 246),
    Srgb::new(153, 177, 251),
    Srgb::new(120, 12, 153),
    Srgb::new(170, 56, 185),
    Srgb::new(224, 159, 249),
    Srgb::new(203, 0, 122),
    Srgb::new(236, 31, 128),
    Srgb::new(243, 141, 169),
    Srgb::new(104, 70, 52),
    Srgb::new(149, 104, 42),
    Srgb::new(248, 178, 119),
    Srgb::new(170, 170, 170),
    Srgb::new(165, 14, 30),
    Srgb::new(250, 128, 114),
    Srgb::new(228, 92, 26),
    Srgb::new(214, 181, 148),
    Srgb::new(156, 132, 49),
    Srgb::new(197, 173, 49),
    Srgb::new(232, 212, 95),
    Srgb::new(74, 107, 58),
    Srgb::new(90, 148, 74),
    Srgb::new(132, 197, 115),
    Srgb::new(15, 121, 159),
    Srgb::new(187, 250, 242),
    Srgb::new(125, 199, 255),
    Srgb::new(77, 49, 184),
    Srgb::new(74, 66, 132),
    Srgb::new(122, 113, 196),
    Srgb::new(181, 174, 241),
    Srgb::new(219, 164, 99),
    Srgb::new(209, 128, 81),
    Srgb::new(255, 197, 165),
    Srgb::new(155, 82, 73),
    Srgb::new(209, 128, 120),
    Srgb::new(250, 182, 164),
    Srgb::new(123, 99, 82),
    Srgb::new(156, 132, 107),
    Srgb::new(51, 57, 65),
    Srgb::new(109, 117, 141),
    Srgb::new(179, 185, 209),
    Srgb::new(109, 100, 63),
    Srgb::new(148, 140, 107),
    Srgb::new(205, 197, 158),
];

/// The full canvas palette with every color marked available.
///
/// ```
/// use palette_match::canvas_palette;
///
/// let entries = canvas_palette();
/// assert_eq!(entries.len(), 64);
/// assert!(entries[0].is_transparent());
/// ```
pub fn canvas_palette() -> Vec<PaletteEntry> {
    let mut entries = Vec::with_capacity(CANVAS_COLORS.len() + 1);
    entries.push(PaletteEntry::transparent());
    entries.extend(
        CANVAS_COLORS
            .iter()
            .enumerate()
            .map(|(i, &rgb)| PaletteEntry::from_srgb(i as u8 + 1, rgb, true)),
    );
    entries
}
