use async_trait::async_trait;
use tokio::sync::watch;

use crate::coords::{AnchorSet, CalibrationSource, CoordinateSystem, ScreenPosition, WorldPosition};
use crate::error::CalibrationError;

/// Anchors supplied up front (e.g. from config), updated through
/// [`publish`](Self::publish).
pub struct StaticCalibrationSource {
    tx: watch::Sender<AnchorSet>,
    min_separation: i64,
}

impl StaticCalibrationSource {
    pub fn new(anchors: AnchorSet, min_separation: i64) -> Self {
        let (tx, _rx) = watch::channel(anchors);
        Self { tx, min_separation }
    }

    /// Push new anchors to every subscriber. An empty set signals a view
    /// change.
    pub fn publish(&self, anchors: AnchorSet) {
        tracing::debug!(anchors = anchors.len(), "Publishing anchors");
        self.tx.send_replace(anchors);
    }

    pub fn current(&self) -> AnchorSet {
        self.tx.borrow().clone()
    }
}

#[async_trait]
impl CalibrationSource for StaticCalibrationSource {
    fn subscribe(&self) -> watch::Receiver<AnchorSet> {
        let mut rx = self.tx.subscribe();
        // New subscribers should pick up the current anchors on first sync
        rx.mark_changed();
        rx
    }

    async fn resolve_world_position(
        &self,
        click: ScreenPosition,
    ) -> Result<WorldPosition, CalibrationError> {
        let mut coords = CoordinateSystem::new(self.min_separation);
        coords.calibrate(self.current())?;
        coords.to_world(&click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Anchor;

    fn anchors() -> AnchorSet {
        AnchorSet::new(vec![
            Anchor::new(WorldPosition::new(0, 0), ScreenPosition::new(0.0, 0.0)),
            Anchor::new(WorldPosition::new(100, 0), ScreenPosition::new(200.0, 0.0)),
        ])
    }

    #[tokio::test]
    async fn test_subscriber_sees_initial_and_published_anchors() {
        let source = StaticCalibrationSource::new(anchors(), 10);
        let mut rx = source.subscribe();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);

        source.publish(AnchorSet::default());
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_world_position() {
        let source = StaticCalibrationSource::new(anchors(), 10);
        let p = source
            .resolve_world_position(ScreenPosition::new(21.0, 41.0))
            .await
            .unwrap();
        assert_eq!(p, WorldPosition::new(10, 20));
    }

    #[tokio::test]
    async fn test_resolve_without_anchors_fails() {
        let source = StaticCalibrationSource::new(AnchorSet::default(), 10);
        let result = source
            .resolve_world_position(ScreenPosition::new(0.0, 0.0))
            .await;
        assert!(matches!(
            result,
            Err(CalibrationError::NotCalibrated { anchors: 0 })
        ));
    }
}
