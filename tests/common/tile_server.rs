//! Mock tile server.

use tileplan::coords::TileCoord;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer serving canvas tiles.
///
/// Tiles that were never mocked answer 404, which reads as a blank tile.
pub struct MockTileServer {
    pub server: MockServer,
}

impl MockTileServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// URL template with `{x}` and `{y}` placeholders
    pub fn template(&self) -> String {
        format!("{}/tiles/{{x}}/{{y}}.png", self.server.uri())
    }

    fn tile_path(tile: TileCoord) -> String {
        format!("/tiles/{}/{}.png", tile.x, tile.y)
    }

    /// Serve `png` for `tile`
    pub async fn mock_tile(&self, tile: TileCoord, png: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(Self::tile_path(tile)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer `status` for `tile`, expecting exactly `calls` requests
    pub async fn mock_status(&self, tile: TileCoord, status: u16, calls: u64) {
        Mock::given(method("GET"))
            .and(path(Self::tile_path(tile)))
            .respond_with(ResponseTemplate::new(status))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Serve a body that is not a PNG
    pub async fn mock_garbage(&self, tile: TileCoord) {
        Mock::given(method("GET"))
            .and(path(Self::tile_path(tile)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not a png".to_vec()))
            .mount(&self.server)
            .await;
    }
}
