//! Paint actuators.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coords::WorldPosition;
use crate::error::BotError;
use crate::models::DrawTask;

/// Performs one paint operation.
#[async_trait]
pub trait PaintActuator: Send + Sync {
    async fn paint(&self, position: WorldPosition, color: u8) -> Result<(), BotError>;
}

#[derive(Serialize)]
struct PaintRecord {
    at: DateTime<Utc>,
    #[serde(flatten)]
    task: DrawTask,
}

/// Writes every paint as one JSON object per line.
pub struct JsonLinesActuator<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesActuator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Result<W, BotError> {
        self.out
            .into_inner()
            .map_err(|_| BotError::Internal("actuator writer poisoned".to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> PaintActuator for JsonLinesActuator<W> {
    async fn paint(&self, position: WorldPosition, color: u8) -> Result<(), BotError> {
        let record = PaintRecord {
            at: Utc::now(),
            task: DrawTask::new(position, color),
        };
        let line = serde_json::to_string(&record).map_err(|e| BotError::Paint(e.to_string()))?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| BotError::Internal("actuator writer poisoned".to_string()))?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// Keeps paints in memory. Used for dry runs and tests.
#[derive(Clone, Default)]
pub struct RecordingActuator {
    painted: Arc<Mutex<Vec<DrawTask>>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn painted(&self) -> Vec<DrawTask> {
        self.painted
            .lock()
            .map(|painted| painted.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaintActuator for RecordingActuator {
    async fn paint(&self, position: WorldPosition, color: u8) -> Result<(), BotError> {
        let mut painted = self
            .painted
            .lock()
            .map_err(|_| BotError::Internal("recording poisoned".to_string()))?;
        painted.push(DrawTask::new(position, color));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_lines_actuator() {
        let actuator = JsonLinesActuator::new(Vec::new());
        actuator
            .paint(WorldPosition::from_tile(1, 2, 3, 4).unwrap(), 5)
            .await
            .unwrap();
        actuator.paint(WorldPosition::new(0, 0), 0).await.unwrap();

        let out = String::from_utf8(actuator.into_inner().unwrap()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["position"], serde_json::json!([1, 2, 3, 4]));
        assert_eq!(lines[0]["color"], 5);
        assert!(lines[0]["at"].is_string());
    }

    #[tokio::test]
    async fn test_recording_actuator_shares_state() {
        let actuator = RecordingActuator::new();
        let handle = actuator.clone();
        actuator.paint(WorldPosition::new(1, 1), 3).await.unwrap();
        assert_eq!(handle.painted(), vec![DrawTask::new(WorldPosition::new(1, 1), 3)]);
    }
}
