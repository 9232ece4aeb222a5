//! Session runner: palette refresh, read-map, planning and painting.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use palette_match::{ColorMatcher, Palette};
use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;

use super::actuator::PaintActuator;
use super::canvas_reader::{CanvasSnapshot, LiveCanvasReader, PrefetchReport};
use super::palette_source::PaletteSource;
use super::persistence::SaveData;
use super::png_codec::decode_png;
use crate::coords::{
    calibrate, AnchorSet, CalibrationSource, CoordinateSystem, ScreenPosition, TileCoord,
    WorldPosition,
};
use crate::error::{BotError, CalibrationError, ConfigurationError};
use crate::models::{ImageSettings, PlacedImage};
use crate::planner::{self, Plan};
use crate::scheduler::{ImageQueue, Progress, Scheduler, SchedulerStrategy};
use crate::stop::StopSignal;

/// External collaborators of a session.
#[derive(Clone)]
pub struct Services {
    pub palette: Arc<dyn PaletteSource>,
    pub canvas: Arc<dyn LiveCanvasReader>,
    pub actuator: Arc<dyn PaintActuator>,
    pub calibration: Arc<dyn CalibrationSource>,
}

/// Tunables taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub strategy: SchedulerStrategy,
    pub min_anchor_separation: i64,
    pub pixels_per_hour: f64,
}

/// Outcome of planning all images against a fresh canvas read.
#[derive(Debug, Clone, Default)]
pub struct PlannedRun {
    pub queues: Vec<ImageQueue>,
    pub plans: Vec<PlanCounts>,
    pub failed_tiles: Vec<TileCoord>,
}

impl PlannedRun {
    pub fn task_count(&self) -> usize {
        self.queues.iter().map(|q| q.tasks.len()).sum()
    }
}

/// Per-image planning counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanCounts {
    pub cells: usize,
    pub tasks: usize,
    pub done: usize,
    pub filtered: usize,
    pub transparent: usize,
    pub outside: usize,
    pub unread: usize,
}

impl From<&Plan> for PlanCounts {
    fn from(plan: &Plan) -> Self {
        Self {
            cells: plan.cells,
            tasks: plan.tasks.len(),
            done: plan.done,
            filtered: plan.filtered,
            transparent: plan.transparent,
            outside: plan.outside,
            unread: plan.unread,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub painted: usize,
    pub plans: Vec<PlanCounts>,
    pub failed_tiles: Vec<TileCoord>,
    pub cancelled: bool,
    pub progress: Progress,
}

/// One painting session over a list of placed images.
pub struct Session {
    services: Services,
    anchor_updates: watch::Receiver<AnchorSet>,
    matcher: ColorMatcher,
    coords: CoordinateSystem,
    images: Vec<PlacedImage>,
    scheduler: Scheduler,
    stop: StopSignal,
    pixels_per_hour: f64,
}

impl Session {
    /// Start a session: read the palette and subscribe to anchor updates.
    pub async fn start(services: Services, settings: SessionSettings) -> Result<Self, BotError> {
        let palette = Palette::new(services.palette.current_palette().await?)?;
        tracing::info!(
            colors = palette.len(),
            available = palette.available_count(),
            strategy = %settings.strategy,
            "Session started"
        );
        let anchor_updates = services.calibration.subscribe();
        Ok(Self {
            services,
            anchor_updates,
            matcher: ColorMatcher::new(palette),
            coords: CoordinateSystem::new(settings.min_anchor_separation),
            images: Vec::new(),
            scheduler: Scheduler::new(settings.strategy),
            stop: StopSignal::new(),
            pixels_per_hour: settings.pixels_per_hour,
        })
    }

    pub fn images(&self) -> &[PlacedImage] {
        &self.images
    }

    pub fn image_mut(&mut self, index: usize) -> Option<&mut PlacedImage> {
        self.images.get_mut(index)
    }

    pub fn add_image(&mut self, image: PlacedImage) {
        tracing::info!(source = %image.settings().source, position = %image.position(), "Image added");
        self.images.push(image);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<PlacedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Move an image unless it is locked.
    pub fn move_image(&mut self, index: usize, position: WorldPosition) -> Result<(), BotError> {
        let image = self
            .images
            .get_mut(index)
            .ok_or_else(|| ConfigurationError::Invalid(format!("no image at index {index}")))?;
        if image.settings().lock {
            return Err(ConfigurationError::Invalid(format!(
                "image {} is locked",
                image.settings().source
            ))
            .into());
        }
        image.set_position(position);
        Ok(())
    }

    pub fn strategy(&self) -> SchedulerStrategy {
        self.scheduler.strategy()
    }

    pub fn set_strategy(&mut self, strategy: SchedulerStrategy) {
        self.scheduler = Scheduler::new(strategy);
    }

    pub fn matcher(&self) -> &ColorMatcher {
        &self.matcher
    }

    pub fn coords(&self) -> &CoordinateSystem {
        &self.coords
    }

    /// Handle for stopping a run from elsewhere.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Re-read color availability. Every grid is rebuilt on next use.
    pub async fn refresh_palette(&mut self) -> Result<(), BotError> {
        let palette = Palette::new(self.services.palette.current_palette().await?)?;
        tracing::debug!(available = palette.available_count(), "Palette refreshed");
        self.matcher.set_palette(palette);
        for image in &mut self.images {
            image.invalidate();
        }
        Ok(())
    }

    /// Resolve screen clicks into anchors and calibrate with them.
    pub async fn calibrate(&mut self, clicks: &[ScreenPosition], timeout: Duration) -> Result<(), BotError> {
        let anchors = match calibrate(self.services.calibration.as_ref(), clicks, timeout, &self.stop).await {
            Err(CalibrationError::Cancelled) => {
                self.stop.reset();
                return Err(CalibrationError::Cancelled.into());
            }
            result => result?,
        };
        self.coords.calibrate(anchors)?;
        tracing::info!(anchors = clicks.len(), generation = self.coords.generation(), "Calibrated");
        Ok(())
    }

    /// Apply anchor updates pushed by the calibration source.
    pub fn sync_anchors(&mut self) -> Result<bool, CalibrationError> {
        let changed = self.coords.sync(&mut self.anchor_updates)?;
        if changed {
            tracing::info!(
                calibrated = self.coords.is_calibrated(),
                generation = self.coords.generation(),
                "Anchors updated"
            );
        }
        Ok(changed)
    }

    /// Clear the canvas cache and read every tile the images cover.
    pub async fn read_map(&self) -> (CanvasSnapshot, PrefetchReport) {
        self.services.canvas.clear();
        let tiles: BTreeSet<TileCoord> = self
            .images
            .iter()
            .flat_map(planner::tiles_for)
            .collect();
        let tiles: Vec<TileCoord> = tiles.into_iter().collect();
        let report = self.services.canvas.prefetch_tiles(&tiles).await;
        (self.services.canvas.snapshot(), report)
    }

    /// Quantize stale images, read the map and build one queue per image.
    pub async fn plan<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<PlannedRun, BotError> {
        if !self.coords.is_calibrated() {
            return Err(CalibrationError::NotCalibrated {
                anchors: self.coords.anchors().len(),
            }
            .into());
        }

        let mut quantized = Vec::with_capacity(self.images.len());
        for image in &mut self.images {
            quantized.push(image.ensure_quantized(&mut self.matcher)?);
        }

        let (snapshot, report) = self.read_map().await;

        let mut run = PlannedRun {
            failed_tiles: report.failed,
            ..PlannedRun::default()
        };
        for (image, quantized) in self.images.iter().zip(&quantized) {
            let plan = planner::plan(image, quantized, &self.coords, &snapshot, rng)?;
            tracing::debug!(
                source = %image.settings().source,
                tasks = plan.tasks.len(),
                done = plan.done,
                unread = plan.unread,
                "Image planned"
            );
            run.plans.push(PlanCounts::from(&plan));
            run.queues.push(ImageQueue::new(plan.tasks, plan.cells));
        }
        tracing::info!(
            images = run.queues.len(),
            tasks = run.task_count(),
            failed_tiles = run.failed_tiles.len(),
            "Planned run"
        );
        Ok(run)
    }

    /// Refresh the palette, plan every image, then paint one task at a
    /// time until all queues are empty or the session is stopped.
    ///
    /// A stop is consumed by the run it ends, so a later run starts over
    /// from a fresh plan.
    pub async fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RunReport, BotError> {
        self.refresh_palette().await?;
        self.sync_anchors()?;
        let mut planned = self.plan(rng).await?;

        let mut painted = 0;
        let mut cancelled = false;
        loop {
            if self.stop.is_stopped() {
                cancelled = true;
                break;
            }
            self.sync_anchors()?;
            let Some((index, task)) = self.scheduler.next(&mut planned.queues) else {
                break;
            };
            let screen = self.coords.to_screen(&task.position)?;
            tracing::trace!(image = index, position = %task.position, color = task.color, x = screen.x, y = screen.y, "Painting");
            self.services.actuator.paint(task.position, task.color).await?;
            painted += 1;
        }

        let progress = Progress::overall(&planned.queues, self.pixels_per_hour);
        if cancelled {
            // The stop ends this run only; the next run re-plans and resumes
            self.stop.reset();
            tracing::info!(painted, %progress, "Run stopped");
        } else {
            tracing::info!(painted, %progress, "Run finished");
        }
        Ok(RunReport {
            painted,
            plans: planned.plans,
            failed_tiles: planned.failed_tiles,
            cancelled,
            progress,
        })
    }

    /// Settings to persist.
    pub fn save_data(&self) -> SaveData {
        SaveData::new(
            self.strategy(),
            self.images.iter().map(|i| i.settings().clone()).collect(),
        )
    }
}

/// Load a PNG from disk and place it with `settings`. Relative sources are
/// resolved against `base`.
pub async fn load_image_relative(settings: ImageSettings, base: &Path) -> Result<PlacedImage, BotError> {
    let path = base.join(&settings.source);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        ConfigurationError::Decode(format!("cannot read {}: {e}", path.display()))
    })?;
    let bitmap = decode_png(&bytes)
        .map_err(|e| ConfigurationError::Decode(format!("{}: {e}", path.display())))?;
    Ok(PlacedImage::new(settings, bitmap))
}
