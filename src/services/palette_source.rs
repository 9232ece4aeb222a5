use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use palette_match::{canvas_palette, PaletteEntry};
use tokio::sync::RwLock;

use crate::error::BotError;

/// Trait for reading the current palette and color availability
#[async_trait]
pub trait PaletteSource: Send + Sync {
    /// All palette entries, availability as of now
    async fn current_palette(&self) -> Result<Vec<PaletteEntry>, BotError>;
}

/// Built-in canvas palette with availability from configuration
pub struct StaticPaletteSource {
    available: Arc<RwLock<Option<HashSet<u8>>>>,
}

impl StaticPaletteSource {
    /// `None` makes every color available.
    pub fn new(available: Option<Vec<u8>>) -> Self {
        Self {
            available: Arc::new(RwLock::new(available.map(|ids| ids.into_iter().collect()))),
        }
    }

    /// Change which colors are available from now on.
    pub async fn set_available(&self, available: Option<Vec<u8>>) {
        let mut guard = self.available.write().await;
        *guard = available.map(|ids| ids.into_iter().collect());
    }
}

impl Default for StaticPaletteSource {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PaletteSource for StaticPaletteSource {
    async fn current_palette(&self) -> Result<Vec<PaletteEntry>, BotError> {
        let available = self.available.read().await;
        let mut entries = canvas_palette();
        if let Some(ids) = available.as_ref() {
            for entry in entries.iter_mut().filter(|e| !e.is_transparent()) {
                entry.available = ids.contains(&entry.id);
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_all_available_by_default() {
        let source = StaticPaletteSource::default();
        let entries = source.current_palette().await.unwrap();
        assert_eq!(entries.len(), 64);
        assert!(entries.iter().all(|e| e.available));
    }

    #[tokio::test]
    async fn test_configured_availability() {
        let source = StaticPaletteSource::new(Some(vec![1, 5]));
        let entries = source.current_palette().await.unwrap();
        let available: Vec<u8> = entries.iter().filter(|e| e.available).map(|e| e.id).collect();
        assert_eq!(available, vec![0, 1, 5]);

        source.set_available(None).await;
        let entries = source.current_palette().await.unwrap();
        assert!(entries.iter().all(|e| e.available));
    }
}
