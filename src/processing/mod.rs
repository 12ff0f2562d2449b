// src/processing/mod.rs
pub mod classification;
pub mod engine;
pub mod indices;
pub mod parallel;

// Re-export main components
pub use classification::{ClassificationGrid, IndexStats, PixelClass};
pub use engine::{classify, compute, INDEX_RANGE};
pub use parallel::{IndexCalculator, ParallelProcessor, RenderOutput};
