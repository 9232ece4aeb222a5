pub mod actuator;
pub mod calibration_source;
pub mod canvas_reader;
pub mod http_tiles;
pub mod palette_source;
pub mod persistence;
pub mod png_codec;
pub mod session;

pub use actuator::{JsonLinesActuator, PaintActuator, RecordingActuator};
pub use calibration_source::StaticCalibrationSource;
pub use canvas_reader::{
    CachedCanvasReader, CanvasSnapshot, LiveCanvasReader, PrefetchReport, RetryPolicy, TileColors,
    TileSource,
};
pub use http_tiles::HttpTileSource;
pub use palette_source::{PaletteSource, StaticPaletteSource};
pub use persistence::{SaveData, SaveStore, SAVE_VERSION};
pub use png_codec::{decode_png, encode_png, CodecError};
pub use session::{
    load_image_relative, PlanCounts, PlannedRun, RunReport, Services, Session,
    SessionSettings,
};
