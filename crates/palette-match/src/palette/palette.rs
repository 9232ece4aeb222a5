//! Palette struct with availability-aware nearest-color search.

use std::collections::HashSet;
use std::str::FromStr;

use super::entry::{PaletteEntry, TRANSPARENT_ID};
use super::error::PaletteError;
use crate::color::{delta_e_2000, Oklab, Srgb};

/// Maximum number of entries a canvas palette can have (sentinel included).
pub const MAX_PALETTE_SIZE: usize = 64;

/// A validated, ordered set of palette entries.
///
/// Entry order matters: when two entries are equally distant from a color,
/// the one listed first wins.
///
/// # Example
///
/// ```
/// use palette_match::{Palette, PaletteEntry, Srgb};
///
/// let palette = Palette::new(vec![
///     PaletteEntry::transparent(),
///     PaletteEntry::from_srgb(1, Srgb::new(0, 0, 0), true),
///     PaletteEntry::from_srgb(2, Srgb::new(255, 255, 255), false),
/// ])
/// .unwrap();
///
/// assert_eq!(palette.len(), 3);
/// assert!(!palette.get(2).unwrap().available);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Validate and wrap a list of entries.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::TooManyEntries`] above [`MAX_PALETTE_SIZE`] entries
    /// - [`PaletteError::DuplicateId`] when an id repeats
    /// - [`PaletteError::InvalidCoordinates`] when a paintable entry has
    ///   non-finite Oklab coordinates
    /// - [`PaletteError::EmptyPalette`] when nothing but the sentinel remains
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyEntries {
                count: entries.len(),
                max: MAX_PALETTE_SIZE,
            });
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(PaletteError::DuplicateId { id: entry.id });
            }
            if !entry.is_transparent() && !entry.oklab.is_finite() {
                return Err(PaletteError::InvalidCoordinates { id: entry.id });
            }
        }

        if !entries.iter().any(|e| !e.is_transparent()) {
            return Err(PaletteError::EmptyPalette);
        }

        Ok(Self { entries })
    }

    /// Create a palette from hex swatches.
    ///
    /// The transparent sentinel is added as id 0 and the swatches get ids
    /// 1, 2, ... in order, all available.
    ///
    /// ```
    /// use palette_match::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000000", "#FFFFFF"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// assert_eq!(palette.get(2).unwrap().rgb.unwrap().to_bytes(), [255, 255, 255]);
    /// ```
    pub fn from_hex(swatches: &[&str]) -> Result<Self, PaletteError> {
        let mut entries = Vec::with_capacity(swatches.len() + 1);
        entries.push(PaletteEntry::transparent());
        for (i, hex) in swatches.iter().enumerate() {
            let rgb = Srgb::from_str(hex)?;
            let id = u8::try_from(i + 1).map_err(|_| PaletteError::TooManyEntries {
                count: swatches.len() + 1,
                max: MAX_PALETTE_SIZE,
            })?;
            entries.push(PaletteEntry::from_srgb(id, rgb, true));
        }
        Palette::new(entries)
    }

    /// Returns the number of entries, sentinel included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in palette order.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Look up an entry by id.
    pub fn get(&self, id: u8) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Swatch color for an id, if the entry exists and has one.
    pub fn rgb(&self, id: u8) -> Option<Srgb> {
        self.get(id).and_then(|e| e.rgb)
    }

    /// Entries that take part in nearest-color search (everything except
    /// the sentinel).
    pub fn paintable(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter().filter(|e| !e.is_transparent())
    }

    /// Number of paintable entries currently available.
    pub fn available_count(&self) -> usize {
        self.paintable().filter(|e| e.available).count()
    }

    /// Nearest paintable entry to `color` under [`delta_e_2000`] with the
    /// given bias.
    ///
    /// With `available_only` set, unavailable entries are skipped. Returns
    /// `None` when no entry qualifies. Ties go to the entry listed first.
    pub fn find_nearest(&self, color: Oklab, bias: f64, available_only: bool) -> Option<(u8, f64)> {
        let mut best: Option<(u8, f64)> = None;
        for entry in self.paintable() {
            if available_only && !entry.available {
                continue;
            }
            let dist = delta_e_2000(color, entry.oklab, bias);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((entry.id, dist)),
            }
        }
        best
    }

    /// Ids whose entries are currently available, sentinel excluded.
    pub fn available_ids(&self) -> Vec<u8> {
        self.paintable()
            .filter(|e| e.available)
            .map(|e| e.id)
            .collect()
    }

    /// True when `id` is the sentinel.
    #[inline]
    pub fn is_transparent(id: u8) -> bool {
        id == TRANSPARENT_ID
    }
}
