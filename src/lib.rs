// src/lib.rs
pub mod config;
pub mod error;
pub mod grid;
pub mod palette;
pub mod processing;
pub mod utils;

#[cfg(feature = "gdal")]
pub mod batch;
#[cfg(feature = "gdal")]
pub mod cli;
#[cfg(feature = "gdal")]
pub mod io;

pub use error::{Error, Result};
pub use grid::{BandGrid, Mask};
pub use palette::{ColorRamp, ColorStop, PaletteMapper, RampPreset, Rgb, Rgba, RgbaImage};
pub use processing::{classify, compute, ClassificationGrid, IndexStats, ParallelProcessor, PixelClass, RenderOutput};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
