//! Turning a quantized image and the live canvas into paint tasks.

pub mod traversal;

use std::collections::VecDeque;

use rand::Rng;

use crate::coords::{CoordinateSystem, TileCoord, WorldPosition};
use crate::error::{BotError, ConfigurationError};
use crate::models::{DrawTask, PlacedImage, Quantized};
use palette_match::TRANSPARENT_ID;

pub use traversal::{traverse, TraversalStrategy};

/// Read access to canvas colors.
pub trait CanvasView {
    /// Palette id at `p`, or `None` when its tile has not been read.
    fn color_at(&self, p: &WorldPosition) -> Option<u8>;
}

/// Tasks of one image plus what was left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub tasks: VecDeque<DrawTask>,
    /// Cells in the image grid
    pub cells: usize,
    /// Cells already showing the wanted color
    pub done: usize,
    /// Cells whose color is disabled in the filter
    pub filtered: usize,
    /// Transparent cells left alone
    pub transparent: usize,
    /// Cells outside the world
    pub outside: usize,
    /// Cells in tiles that could not be read
    pub unread: usize,
}

/// Tiles an image covers, for the read-map phase.
pub fn tiles_for(image: &PlacedImage) -> Vec<TileCoord> {
    image.tiles()
}

/// Build the ordered task queue for `image`.
///
/// A task is emitted for a cell when the canvas color differs from the
/// drawable color, the cell is not transparent (unless the image erases),
/// and its ideal color is not disabled. With "draw colors in order" the
/// tasks are then stably grouped by filter position.
///
/// Fails before touching the canvas when the coordinate system is not
/// usable at the image origin or the grid is empty.
pub fn plan<C, R>(
    image: &PlacedImage,
    quantized: &Quantized,
    coords: &CoordinateSystem,
    canvas: &C,
    rng: &mut R,
) -> Result<Plan, BotError>
where
    C: CanvasView + ?Sized,
    R: Rng + ?Sized,
{
    let settings = image.settings();
    coords.to_screen(&settings.position)?;

    let grid = &quantized.grid;
    if grid.is_empty() {
        return Err(ConfigurationError::Invalid(format!("image {} has no cells", settings.source)).into());
    }

    let mut result = Plan {
        cells: grid.len(),
        ..Plan::default()
    };
    let mut emitted: Vec<(DrawTask, u8)> = Vec::new();

    for (x, y) in traverse(grid.width(), grid.height(), settings.strategy, rng) {
        let Some(cell) = grid.get(x, y) else { continue };
        let position = settings.position.offset(x as i64, y as i64);

        if !position.in_world() {
            result.outside += 1;
            continue;
        }
        if cell.drawable == TRANSPARENT_ID && !settings.draw_transparent {
            result.transparent += 1;
            continue;
        }
        if settings.colors.is_disabled(cell.ideal) {
            result.filtered += 1;
            continue;
        }
        let Some(current) = canvas.color_at(&position) else {
            result.unread += 1;
            continue;
        };
        if current == cell.drawable {
            result.done += 1;
            continue;
        }
        emitted.push((DrawTask::new(position, cell.drawable), cell.ideal));
    }

    if settings.draw_colors_in_order {
        emitted.sort_by_key(|(_, ideal)| settings.colors.position(*ideal).unwrap_or(usize::MAX));
    }
    result.tasks = emitted.into_iter().map(|(task, _)| task).collect();

    tracing::debug!(
        source = %settings.source,
        tasks = result.tasks.len(),
        done = result.done,
        filtered = result.filtered,
        outside = result.outside,
        unread = result.unread,
        "Planned image"
    );
    Ok(result)
}
