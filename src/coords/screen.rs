use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position on the screen in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

impl ScreenPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &ScreenPosition) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Parses `"x,y"`, e.g. a click given on the command line.
impl FromStr for ScreenPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid coordinate {v:?} in {s:?}"))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}
