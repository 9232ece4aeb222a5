//! World coordinates, screen coordinates and the transform between them.

pub mod anchors;
pub mod calibration;
pub mod screen;
pub mod system;
pub mod world;

pub use anchors::{Anchor, AnchorSet, MIN_ANCHORS};
pub use calibration::{calibrate, CalibrationSource};
pub use screen::ScreenPosition;
pub use system::{CoordinateSystem, DEFAULT_MIN_SEPARATION};
pub use world::{TileCoord, WorldPosition, TILE_SIZE, WORLD_SIZE, WORLD_TILES};
