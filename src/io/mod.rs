// src/io/mod.rs
pub mod reader;
pub mod writer;

pub use reader::{read_band, read_mask, read_scene, GeoInfo};
pub use writer::{write_index, write_rgba};
