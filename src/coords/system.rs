//! World ↔ screen transform derived from calibration anchors.

use tokio::sync::watch;

use super::anchors::{Anchor, AnchorSet, MIN_ANCHORS};
use super::{ScreenPosition, WorldPosition};
use crate::error::CalibrationError;

/// Default minimum X separation, in world pixels, between the two anchors
/// of a transform.
pub const DEFAULT_MIN_SEPARATION: i64 = 10;

/// Maps world positions to screen positions.
///
/// With exactly two anchors the first one is the origin and the pair gives
/// one global scale. With more anchors each position is resolved against
/// its bounding pair (see [`AnchorSet::bounding_pair`]).
///
/// Every successful calibration or invalidation bumps
/// [`generation`](Self::generation), so holders of derived screen positions
/// can tell they are stale.
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    anchors: AnchorSet,
    calibrated: bool,
    min_separation: i64,
    generation: u64,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SEPARATION)
    }
}

impl CoordinateSystem {
    /// An uncalibrated system.
    pub fn new(min_separation: i64) -> Self {
        Self {
            anchors: AnchorSet::default(),
            calibrated: false,
            min_separation,
            generation: 0,
        }
    }

    /// Replace the anchors.
    ///
    /// On error the system is left uncalibrated; the previous anchors are
    /// not kept.
    pub fn calibrate(&mut self, anchors: AnchorSet) -> Result<(), CalibrationError> {
        self.generation += 1;
        self.calibrated = false;
        if anchors.len() < MIN_ANCHORS {
            let count = anchors.len();
            self.anchors = anchors;
            return Err(CalibrationError::NotCalibrated { anchors: count });
        }
        let result = self.check_pair(&anchors, 0, 1);
        self.anchors = anchors;
        result?;
        self.calibrated = true;
        tracing::debug!(
            anchors = self.anchors.len(),
            generation = self.generation,
            "Coordinate system calibrated"
        );
        Ok(())
    }

    /// Forget all anchors, e.g. after the view changed.
    pub fn invalidate(&mut self) {
        self.anchors = AnchorSet::default();
        self.calibrated = false;
        self.generation += 1;
    }

    /// Apply a pushed anchor update if one arrived since the last call.
    ///
    /// Returns `Ok(true)` when the anchors changed. An empty update
    /// invalidates the system.
    pub fn sync(&mut self, updates: &mut watch::Receiver<AnchorSet>) -> Result<bool, CalibrationError> {
        if !updates.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        let anchors = updates.borrow_and_update().clone();
        if anchors.is_empty() {
            self.invalidate();
            return Ok(true);
        }
        self.calibrate(anchors)?;
        Ok(true)
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    pub fn min_separation(&self) -> i64 {
        self.min_separation
    }

    /// Screen pixels per world pixel around `p`.
    pub fn scale_at(&self, p: &WorldPosition) -> Result<f64, CalibrationError> {
        let (origin, other) = self.pair_for_world(p)?;
        Ok(scale(&origin, &other))
    }

    /// Where `p` appears on screen.
    pub fn to_screen(&self, p: &WorldPosition) -> Result<ScreenPosition, CalibrationError> {
        let (origin, other) = self.pair_for_world(p)?;
        let scale = scale(&origin, &other);
        Ok(ScreenPosition::new(
            origin.screen.x + (p.x - origin.world.x) as f64 * scale,
            origin.screen.y + (p.y - origin.world.y) as f64 * scale,
        ))
    }

    /// World pixel under the screen position `s`.
    pub fn to_world(&self, s: &ScreenPosition) -> Result<WorldPosition, CalibrationError> {
        let (i, j) = if self.anchors.len() == MIN_ANCHORS {
            (0, 1)
        } else {
            self.anchors.bounding_pair_on_screen(s)
        };
        let (origin, other) = self.pair(i, j)?;
        let scale = scale(&origin, &other);
        Ok(WorldPosition::new(
            (origin.world.x as f64 + (s.x - origin.screen.x) / scale).floor() as i64,
            (origin.world.y as f64 + (s.y - origin.screen.y) / scale).floor() as i64,
        ))
    }

    fn pair_for_world(&self, p: &WorldPosition) -> Result<(Anchor, Anchor), CalibrationError> {
        let (i, j) = if self.anchors.len() == MIN_ANCHORS {
            (0, 1)
        } else {
            self.anchors.bounding_pair(p)
        };
        self.pair(i, j)
    }

    fn pair(&self, i: usize, j: usize) -> Result<(Anchor, Anchor), CalibrationError> {
        if !self.calibrated {
            return Err(CalibrationError::NotCalibrated {
                anchors: self.anchors.len(),
            });
        }
        self.check_pair(&self.anchors, i, j)?;
        match (self.anchors.get(i), self.anchors.get(j)) {
            (Some(a), Some(b)) => Ok((*a, *b)),
            _ => Err(CalibrationError::NotCalibrated {
                anchors: self.anchors.len(),
            }),
        }
    }

    fn check_pair(&self, anchors: &AnchorSet, i: usize, j: usize) -> Result<(), CalibrationError> {
        let (Some(a), Some(b)) = (anchors.get(i), anchors.get(j)) else {
            return Err(CalibrationError::NotCalibrated {
                anchors: anchors.len(),
            });
        };
        let separation = (b.world.x - a.world.x).abs();
        if separation < self.min_separation.max(1) {
            return Err(CalibrationError::AnchorsTooClose {
                separation,
                min: self.min_separation,
            });
        }
        Ok(())
    }
}

fn scale(origin: &Anchor, other: &Anchor) -> f64 {
    (other.screen.x - origin.screen.x) / (other.world.x - origin.world.x) as f64
}
