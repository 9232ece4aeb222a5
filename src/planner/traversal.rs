//! Cell visiting orders.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Order in which an image's cells are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraversalStrategy {
    /// Uniform random permutation, fresh every run
    #[default]
    Random,
    /// Rows top to bottom, left to right within a row
    Down,
    /// Rows bottom to top, left to right within a row
    Up,
    /// Columns left to right, top to bottom within a column
    Left,
    /// Columns right to left, top to bottom within a column
    Right,
    /// Square spiral growing out of the centre
    SpiralFromCenter,
    /// The outward spiral, reversed
    SpiralToCenter,
}

impl TraversalStrategy {
    pub const ALL: [TraversalStrategy; 7] = [
        TraversalStrategy::Random,
        TraversalStrategy::Down,
        TraversalStrategy::Up,
        TraversalStrategy::Left,
        TraversalStrategy::Right,
        TraversalStrategy::SpiralFromCenter,
        TraversalStrategy::SpiralToCenter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalStrategy::Random => "RANDOM",
            TraversalStrategy::Down => "DOWN",
            TraversalStrategy::Up => "UP",
            TraversalStrategy::Left => "LEFT",
            TraversalStrategy::Right => "RIGHT",
            TraversalStrategy::SpiralFromCenter => "SPIRAL_FROM_CENTER",
            TraversalStrategy::SpiralToCenter => "SPIRAL_TO_CENTER",
        }
    }
}

impl fmt::Display for TraversalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| format!("unknown traversal strategy: {}", s))
    }
}

/// Every `(x, y)` of a `width × height` grid, exactly once, in the order
/// given by `strategy`. `rng` is only used by [`TraversalStrategy::Random`].
pub fn traverse<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    strategy: TraversalStrategy,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    match strategy {
        TraversalStrategy::Down => row_major(width, (0..height).collect()),
        TraversalStrategy::Up => row_major(width, (0..height).rev().collect()),
        TraversalStrategy::Left => column_major(height, (0..width).collect()),
        TraversalStrategy::Right => column_major(height, (0..width).rev().collect()),
        TraversalStrategy::Random => {
            let mut cells = row_major(width, (0..height).collect());
            cells.shuffle(rng);
            cells
        }
        TraversalStrategy::SpiralFromCenter => spiral(width, height),
        TraversalStrategy::SpiralToCenter => {
            let mut cells = spiral(width, height);
            cells.reverse();
            cells
        }
    }
}

fn row_major(width: usize, rows: Vec<usize>) -> Vec<(usize, usize)> {
    rows.into_iter()
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .collect()
}

fn column_major(height: usize, columns: Vec<usize>) -> Vec<(usize, usize)> {
    columns
        .into_iter()
        .flat_map(|x| (0..height).map(move |y| (x, y)))
        .collect()
}

const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Right-handed square spiral from `(w/2, h/2)`: right, down, left, up,
/// with the run length growing after every second turn. Cells outside the
/// grid are stepped over until every cell has been visited.
fn spiral(width: usize, height: usize) -> Vec<(usize, usize)> {
    let total = width * height;
    let mut cells = Vec::with_capacity(total);
    let mut visited = HashSet::with_capacity(total);
    let (w, h) = (width as i64, height as i64);
    let (mut x, mut y) = (w / 2, h / 2);
    let mut direction = 0;
    let mut steps = 1;

    while cells.len() < total {
        for _ in 0..2 {
            for _ in 0..steps {
                if (0..w).contains(&x) && (0..h).contains(&y) && visited.insert((x, y)) {
                    cells.push((x as usize, y as usize));
                    if cells.len() == total {
                        return cells;
                    }
                }
                x += DIRECTIONS[direction].0;
                y += DIRECTIONS[direction].1;
            }
            direction = (direction + 1) % 4;
        }
        steps += 1;
    }
    cells
}
