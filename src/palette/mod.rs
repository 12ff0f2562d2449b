// src/palette/mod.rs
pub mod color;
pub mod mapper;
pub mod ramp;

pub use color::{Rgb, Rgba, RgbaImage};
pub use mapper::{render, PaletteMapper, COLLISION_TOLERANCE};
pub use ramp::{ColorRamp, ColorStop, RampPreset};
