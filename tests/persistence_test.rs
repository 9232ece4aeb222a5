//! Saving and restoring session state.

use palette_match::{DemandTable, Match};
use pretty_assertions::assert_eq;
use tileplan::coords::WorldPosition;
use tileplan::models::{ColorFilter, ImageSettings};
use tileplan::planner::TraversalStrategy;
use tileplan::scheduler::SchedulerStrategy;
use tileplan::services::{SaveData, SaveStore, SAVE_VERSION};

fn settings() -> ImageSettings {
    let mut settings = ImageSettings::new("art/cat.png", WorldPosition::new(1_234_567, 89), 64);
    settings.brightness = -2.5;
    settings.strategy = TraversalStrategy::SpiralFromCenter;
    settings.draw_colors_in_order = true;
    settings.lock = true;
    let mut demand = DemandTable::new();
    for _ in 0..10 {
        demand.record(Match { drawable: 3, ideal: 3 });
    }
    for _ in 0..4 {
        demand.record(Match { drawable: 1, ideal: 1 });
    }
    settings.colors = ColorFilter::from_demand(&demand);
    settings.colors.set_disabled(1, true);
    settings
}

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = SaveStore::new(dir.path().join("save.json"));
    let data = SaveData::new(SchedulerStrategy::All, vec![settings()]);

    store.save(&data).await.unwrap();
    let loaded = store.load().await.unwrap().unwrap();

    assert_eq!(loaded.version, SAVE_VERSION);
    assert_eq!(loaded.strategy, SchedulerStrategy::All);
    assert_eq!(loaded.images, vec![settings()]);
    assert!(loaded.saved_at.is_some());

    // No temp file left behind
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_missing_save_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = SaveStore::new(dir.path().join("nothing.json"));

    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_other_version_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    std::fs::write(&path, r#"{"version":1,"strategy":"ALL","images":[]}"#).unwrap();

    let store = SaveStore::new(&path);
    assert!(store.load().await.unwrap().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_corrupt_save_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = SaveStore::new(&path);
    assert!(store.load().await.unwrap().is_none());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_position_saved_as_tile_and_local() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    let store = SaveStore::new(&path);
    store
        .save(&SaveData::new(SchedulerStrategy::Sequential, vec![settings()]))
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["images"][0]["position"], serde_json::json!([1234, 0, 567, 89]));
    assert_eq!(json["strategy"], "SEQUENTIAL");
}

#[tokio::test]
async fn test_overflowing_position_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    let store = SaveStore::new(&path);
    store
        .save(&SaveData::new(SchedulerStrategy::All, vec![settings()]))
        .await
        .unwrap();

    let mut json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    json["images"][0]["position"] = serde_json::json!([i64::MAX, 0, 0, 0]);
    std::fs::write(&path, json.to_string()).unwrap();

    assert!(store.load().await.unwrap().is_none());
    assert!(!path.exists());
}
