//! Quantized grid and demand table.

use std::collections::BTreeMap;

use super::bitmap::{Bitmap, CLEAR};
use crate::matcher::Match;
use crate::palette::{Palette, TRANSPARENT_ID};

/// Palette ids per cell, row-major.
///
/// Every cell stores the drawable id (what will be painted) and the ideal
/// id (what the source pixel actually asked for).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedGrid {
    width: usize,
    height: usize,
    drawable: Vec<u8>,
    ideal: Vec<u8>,
}

impl QuantizedGrid {
    /// Grid of `width × height` transparent cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            drawable: vec![TRANSPARENT_ID; width * height],
            ideal: vec![TRANSPARENT_ID; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.drawable.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawable.is_empty()
    }

    /// Both ids of the cell at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<Match> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        Some(Match {
            drawable: self.drawable[i],
            ideal: self.ideal[i],
        })
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, m: Match) {
        let i = y * self.width + x;
        self.drawable[i] = m.drawable;
        self.ideal[i] = m.ideal;
    }

    /// Drawable ids, row-major.
    #[inline]
    pub fn drawable_ids(&self) -> &[u8] {
        &self.drawable
    }

    /// Ideal ids, row-major.
    #[inline]
    pub fn ideal_ids(&self) -> &[u8] {
        &self.ideal
    }

    /// Render the drawable ids back to RGBA using the palette swatches.
    ///
    /// The sentinel and ids without a swatch become fully transparent.
    pub fn to_bitmap(&self, palette: &Palette) -> Bitmap {
        let mut out = Bitmap::filled(self.width, self.height, CLEAR);
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.drawable[y * self.width + x];
                if let Some(rgb) = palette.rgb(id) {
                    let [r, g, b] = rgb.to_bytes();
                    out.set_pixel(x, y, [r, g, b, 255]);
                }
            }
        }
        out
    }
}

/// Per-color pixel counts of a quantized image.
///
/// `counts` is keyed by ideal id, the sentinel included. `substitutions`
/// counts the cells of each ideal id that had to be painted with another
/// color because the ideal one is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandTable {
    counts: BTreeMap<u8, usize>,
    substitutions: BTreeMap<u8, usize>,
}

impl DemandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one matched cell.
    pub fn record(&mut self, m: Match) {
        *self.counts.entry(m.ideal).or_insert(0) += 1;
        if m.is_substitution() {
            *self.substitutions.entry(m.ideal).or_insert(0) += 1;
        }
    }

    /// Cells whose ideal color is `id`.
    pub fn count(&self, id: u8) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Substituted cells whose ideal color is `id`.
    pub fn substituted(&self, id: u8) -> usize {
        self.substitutions.get(&id).copied().unwrap_or(0)
    }

    /// Ideal ids present in the image, ascending.
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.counts.keys().copied()
    }

    /// Total number of counted cells.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Total number of substituted cells.
    pub fn total_substituted(&self) -> usize {
        self.substitutions.values().sum()
    }

    /// Paintable ids ordered by pixel count, largest first. Equal counts
    /// keep ascending id order.
    pub fn ids_by_demand(&self) -> Vec<u8> {
        let mut ids: Vec<(u8, usize)> = self
            .counts
            .iter()
            .filter(|(&id, _)| id != TRANSPARENT_ID)
            .map(|(&id, &n)| (id, n))
            .collect();
        ids.sort_by(|a, b| b.1.cmp(&a.1));
        ids.into_iter().map(|(id, _)| id).collect()
    }

    /// Colors that would improve the image if they were available:
    /// `(ideal id, substituted cells)`, most substituted first.
    pub fn colors_to_buy(&self) -> Vec<(u8, usize)> {
        let mut colors: Vec<(u8, usize)> = self
            .substitutions
            .iter()
            .map(|(&id, &n)| (id, n))
            .collect();
        colors.sort_by(|a, b| b.1.cmp(&a.1));
        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::palette::PaletteEntry;

    fn m(drawable: u8, ideal: u8) -> Match {
        Match { drawable, ideal }
    }

    #[test]
    fn test_grid_get_and_bounds() {
        let mut grid = QuantizedGrid::new(2, 2);
        grid.set(1, 0, m(3, 4));
        assert_eq!(grid.get(1, 0), Some(m(3, 4)));
        assert_eq!(grid.get(0, 0), Some(Match::TRANSPARENT));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.drawable_ids(), &[0, 3, 0, 0]);
        assert_eq!(grid.ideal_ids(), &[0, 4, 0, 0]);
    }

    #[test]
    fn test_grid_to_bitmap() {
        let palette = Palette::new(vec![
            PaletteEntry::transparent(),
            PaletteEntry::from_srgb(1, Srgb::new(10, 20, 30), true),
        ])
        .unwrap();
        let mut grid = QuantizedGrid::new(2, 1);
        grid.set(0, 0, m(1, 1));
        let bitmap = grid.to_bitmap(&palette);
        assert_eq!(bitmap.pixels(), &[[10, 20, 30, 255], CLEAR]);
    }

    #[test]
    fn test_demand_counts_and_substitutions() {
        let mut demand = DemandTable::new();
        demand.record(m(1, 1));
        demand.record(m(1, 2));
        demand.record(m(1, 2));
        demand.record(m(1, 3));
        demand.record(Match::TRANSPARENT);

        assert_eq!(demand.count(1), 1);
        assert_eq!(demand.count(2), 2);
        assert_eq!(demand.count(0), 1);
        assert_eq!(demand.total(), 5);
        assert_eq!(demand.total_substituted(), 3);
        assert_eq!(demand.substituted(1), 0);
        assert_eq!(demand.colors_to_buy(), vec![(2, 2), (3, 1)]);
        assert_eq!(demand.ids().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_ids_by_demand_skips_sentinel_and_is_stable() {
        let mut demand = DemandTable::new();
        for _ in 0..5 {
            demand.record(Match::TRANSPARENT);
        }
        demand.record(m(7, 7));
        demand.record(m(3, 3));
        demand.record(m(9, 9));
        demand.record(m(9, 9));
        assert_eq!(demand.ids_by_demand(), vec![9, 3, 7]);
    }
}
