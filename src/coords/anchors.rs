//! Calibration anchors.

use serde::{Deserialize, Serialize};

use super::{ScreenPosition, WorldPosition};

/// Minimum number of anchors for a usable transform.
pub const MIN_ANCHORS: usize = 2;

/// A world position together with where it currently shows up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub world: WorldPosition,
    pub screen: ScreenPosition,
}

impl Anchor {
    pub fn new(world: WorldPosition, screen: ScreenPosition) -> Self {
        Self { world, screen }
    }
}

/// Ordered list of anchors. The first two are the fallback pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorSet {
    anchors: Vec<Anchor>,
}

impl AnchorSet {
    pub fn new(anchors: Vec<Anchor>) -> Self {
        Self { anchors }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Anchor> {
        self.anchors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Anchor indices bounding `p`.
    ///
    /// The first index is the nearest anchor strictly up-left of `p` on both
    /// axes, the second the nearest one strictly down-right, both by
    /// Manhattan distance. Missing sides fall back to anchors 0 and 1, and
    /// the two indices always differ.
    pub fn bounding_pair(&self, p: &WorldPosition) -> (usize, usize) {
        let before = nearest(self.anchors.iter().map(|a| {
            (a.world.x < p.x && a.world.y < p.y).then(|| a.world.manhattan(p) as f64)
        }));
        let after = nearest(self.anchors.iter().map(|a| {
            (a.world.x > p.x && a.world.y > p.y).then(|| a.world.manhattan(p) as f64)
        }));
        resolve_pair(before, after)
    }

    /// Same selection as [`bounding_pair`](Self::bounding_pair), done in
    /// screen space. Used when mapping clicks back to the world.
    pub fn bounding_pair_on_screen(&self, s: &ScreenPosition) -> (usize, usize) {
        let before = nearest(self.anchors.iter().map(|a| {
            (a.screen.x < s.x && a.screen.y < s.y).then(|| a.screen.manhattan(s))
        }));
        let after = nearest(self.anchors.iter().map(|a| {
            (a.screen.x > s.x && a.screen.y > s.y).then(|| a.screen.manhattan(s))
        }));
        resolve_pair(before, after)
    }
}

fn nearest(distances: impl Iterator<Item = Option<f64>>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, d) in distances.enumerate() {
        let Some(d) = d else { continue };
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

fn resolve_pair(before: Option<usize>, after: Option<usize>) -> (usize, usize) {
    match (before, after) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, if a == 1 { 0 } else { 1 }),
        (None, Some(b)) => (if b == 0 { 1 } else { 0 }, b),
        (None, None) => (0, 1),
    }
}
