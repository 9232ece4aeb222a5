//! Tileplan - pixel art planner for a shared tile canvas
//!
//! Quantizes images to the canvas palette, compares them with the live
//! canvas and paints the differences one pixel at a time.
//! This library exposes modules for integration testing.

pub mod coords;
pub mod error;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod services;
pub mod stop;
