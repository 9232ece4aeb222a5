//! Per-image color filter.

use std::collections::HashSet;

use palette_match::DemandTable;
use serde::{Deserialize, Serialize};

/// One color of an image and whether it is excluded from planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub id: u8,
    #[serde(default)]
    pub disabled: bool,
}

/// Ordered list of the ideal colors an image uses.
///
/// The order doubles as the paint order when "draw colors in order" is on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorFilter {
    entries: Vec<FilterEntry>,
}

impl ColorFilter {
    pub fn new(entries: Vec<FilterEntry>) -> Self {
        Self { entries }
    }

    /// Filter listing every color of `demand`, largest demand first.
    pub fn from_demand(demand: &DemandTable) -> Self {
        let mut filter = Self::default();
        filter.regenerate(demand);
        filter
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bring the filter in line with the colors of `demand`.
    ///
    /// Colors still present keep their position and disabled flag, new
    /// colors are appended by descending demand, vanished colors are
    /// dropped. Returns `true` when anything changed.
    pub fn regenerate(&mut self, demand: &DemandTable) -> bool {
        let wanted = demand.ids_by_demand();
        let wanted_set: HashSet<u8> = wanted.iter().copied().collect();
        let current: HashSet<u8> = self.entries.iter().map(|e| e.id).collect();
        if wanted_set == current {
            return false;
        }

        self.entries.retain(|e| wanted_set.contains(&e.id));
        for id in wanted {
            if !current.contains(&id) {
                self.entries.push(FilterEntry {
                    id,
                    disabled: false,
                });
            }
        }
        true
    }

    /// True when `id` is listed and disabled.
    pub fn is_disabled(&self, id: u8) -> bool {
        self.entries.iter().any(|e| e.id == id && e.disabled)
    }

    /// Position of `id` in the list.
    pub fn position(&self, id: u8) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Enable or disable `id`. Returns `false` when the id is not listed.
    pub fn set_disabled(&mut self, id: u8, disabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// Move `id` to `index`, shifting the others. Returns `false` when the
    /// id is not listed.
    pub fn move_to(&mut self, id: u8, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let entry = self.entries.remove(from);
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        true
    }
}
