use serde::{Deserialize, Serialize};

use crate::coords::WorldPosition;

/// One pixel to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawTask {
    /// Where to paint
    pub position: WorldPosition,
    /// Palette id to paint with
    pub color: u8,
}

impl DrawTask {
    pub fn new(position: WorldPosition, color: u8) -> Self {
        Self { position, color }
    }
}
