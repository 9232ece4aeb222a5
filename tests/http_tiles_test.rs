//! Reading canvas tiles over HTTP.

mod common;

use common::{colors, quick_retry, tile_png, MockTileServer};
use palette_match::{canvas_palette, Palette, TRANSPARENT_ID};
use pretty_assertions::assert_eq;
use tileplan::coords::{TileCoord, WorldPosition};
use tileplan::error::TransientIoError;
use tileplan::services::{CachedCanvasReader, HttpTileSource, LiveCanvasReader, TileSource};

fn source(server: &MockTileServer) -> HttpTileSource {
    HttpTileSource::new(server.template(), Palette::new(canvas_palette()).unwrap()).unwrap()
}

#[tokio::test]
async fn test_reads_painted_pixels() {
    let server = MockTileServer::start().await;
    let tile = TileCoord::new(2, 3);
    let png = tile_png(3, 1, &[(0, 0, colors::BLACK), (1, 0, colors::WHITE)]);
    server.mock_tile(tile, png).await;

    let colors = source(&server).fetch_tile(tile).await.unwrap();

    assert_eq!(colors.get(0, 0), Some(colors::BLACK_ID));
    assert_eq!(colors.get(1, 0), Some(colors::WHITE_ID));
    assert_eq!(colors.get(2, 0), Some(TRANSPARENT_ID));
    // Outside the PNG but inside the tile
    assert_eq!(colors.get(500, 500), Some(TRANSPARENT_ID));
}

#[tokio::test]
async fn test_missing_tile_is_blank() {
    let server = MockTileServer::start().await;

    let colors = source(&server).fetch_tile(TileCoord::new(7, 7)).await.unwrap();

    assert_eq!(colors.get(0, 0), Some(TRANSPARENT_ID));
    assert_eq!(colors.get(999, 999), Some(TRANSPARENT_ID));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let server = MockTileServer::start().await;
    let tile = TileCoord::new(1, 0);
    server.mock_status(tile, 503, 1).await;

    let err = source(&server).fetch_tile(tile).await.unwrap_err();

    assert!(matches!(err, TransientIoError::Status { status: 503, .. }));
    assert_eq!(err.tile(), tile);
}

#[tokio::test]
async fn test_invalid_png_is_decode_error() {
    let server = MockTileServer::start().await;
    let tile = TileCoord::new(0, 0);
    server.mock_garbage(tile).await;

    let err = source(&server).fetch_tile(tile).await.unwrap_err();

    assert!(matches!(err, TransientIoError::Decode { .. }));
}

#[tokio::test]
async fn test_reader_retries_then_reports_failed_tile() {
    let server = MockTileServer::start().await;
    let bad = TileCoord::new(1, 0);
    // First attempt plus one retry
    server.mock_status(bad, 500, 2).await;
    server
        .mock_tile(TileCoord::new(0, 0), tile_png(1, 1, &[(0, 0, colors::WHITE)]))
        .await;

    let reader = CachedCanvasReader::new(source(&server), quick_retry());
    let report = reader.prefetch_tiles(&[TileCoord::new(0, 0), bad]).await;

    assert_eq!(report.loaded, 1);
    assert_eq!(report.failed, vec![bad]);
    assert_eq!(reader.color_at(&WorldPosition::new(0, 0)), Some(colors::WHITE_ID));
    assert_eq!(reader.color_at(&WorldPosition::new(1000, 0)), None);
}
