pub mod config;
pub mod filter;
pub mod image;
pub mod task;

pub use config::AppConfig;
pub use filter::{ColorFilter, FilterEntry};
pub use image::{ImageSettings, PlacedImage, Quantized};
pub use task::DrawTask;
