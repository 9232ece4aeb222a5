//! Common test infrastructure for Tileplan integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod tile_server;

pub use fixtures::*;
pub use tile_server::MockTileServer;
