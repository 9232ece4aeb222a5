//! Turning screen clicks into calibration anchors.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{Anchor, AnchorSet, ScreenPosition, WorldPosition};
use crate::error::CalibrationError;
use crate::stop::StopSignal;

/// Provides anchor updates and resolves screen clicks to world positions.
#[async_trait]
pub trait CalibrationSource: Send + Sync {
    /// Receiver for pushed anchor updates. An empty set means the view
    /// changed and the current anchors are no longer valid.
    fn subscribe(&self) -> watch::Receiver<AnchorSet>;

    /// World pixel shown at `click`.
    async fn resolve_world_position(
        &self,
        click: ScreenPosition,
    ) -> Result<WorldPosition, CalibrationError>;
}

/// Resolve every click into an anchor.
///
/// Each resolution is bounded by `timeout` and aborted when `stop` fires.
pub async fn calibrate<S>(
    source: &S,
    clicks: &[ScreenPosition],
    timeout: Duration,
    stop: &StopSignal,
) -> Result<AnchorSet, CalibrationError>
where
    S: CalibrationSource + ?Sized,
{
    let mut anchors = Vec::with_capacity(clicks.len());
    for (index, click) in clicks.iter().enumerate() {
        let world = tokio::select! {
            biased;
            _ = stop.stopped() => return Err(CalibrationError::Cancelled),
            result = tokio::time::timeout(timeout, source.resolve_world_position(*click)) => {
                match result {
                    Ok(world) => world?,
                    Err(_) => {
                        tracing::warn!(index, ?timeout, "Calibration click timed out");
                        return Err(CalibrationError::Timeout(timeout));
                    }
                }
            }
        };
        tracing::debug!(index, %world, x = click.x, y = click.y, "Anchor resolved");
        anchors.push(Anchor::new(world, *click));
    }
    Ok(AnchorSet::new(anchors))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps screen pixels 1:1 to world pixels after `delay`.
    struct SlowSource {
        delay: Duration,
        tx: watch::Sender<AnchorSet>,
    }

    impl SlowSource {
        fn new(delay: Duration) -> Self {
            let (tx, _rx) = watch::channel(AnchorSet::default());
            Self { delay, tx }
        }
    }

    #[async_trait]
    impl CalibrationSource for SlowSource {
        fn subscribe(&self) -> watch::Receiver<AnchorSet> {
            self.tx.subscribe()
        }

        async fn resolve_world_position(
            &self,
            click: ScreenPosition,
        ) -> Result<WorldPosition, CalibrationError> {
            tokio::time::sleep(self.delay).await;
            if click.x < 0.0 {
                return Err(CalibrationError::Source("off canvas".into()));
            }
            Ok(WorldPosition::new(click.x as i64, click.y as i64))
        }
    }

    #[tokio::test]
    async fn test_calibrate_resolves_all_clicks() {
        let source = SlowSource::new(Duration::ZERO);
        let clicks = [ScreenPosition::new(10.0, 20.0), ScreenPosition::new(300.0, 40.0)];
        let anchors = calibrate(&source, &clicks, Duration::from_secs(1), &StopSignal::new())
            .await
            .unwrap();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors.get(1).unwrap().world, WorldPosition::new(300, 40));
    }

    #[tokio::test]
    async fn test_calibrate_times_out() {
        let source = SlowSource::new(Duration::from_secs(60));
        let clicks = [ScreenPosition::new(1.0, 1.0)];
        let result =
            calibrate(&source, &clicks, Duration::from_millis(20), &StopSignal::new()).await;
        assert!(matches!(result, Err(CalibrationError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_calibrate_reports_source_error() {
        let source = SlowSource::new(Duration::ZERO);
        let clicks = [ScreenPosition::new(-1.0, 1.0)];
        let result = calibrate(&source, &clicks, Duration::from_secs(1), &StopSignal::new()).await;
        assert!(matches!(result, Err(CalibrationError::Source(_))));
    }

    #[tokio::test]
    async fn test_calibrate_cancelled() {
        let source = SlowSource::new(Duration::from_secs(60));
        let stop = StopSignal::new();
        stop.stop();
        let clicks = [ScreenPosition::new(1.0, 1.0)];
        let result = calibrate(&source, &clicks, Duration::from_secs(120), &stop).await;
        assert!(matches!(result, Err(CalibrationError::Cancelled)));
    }
}
