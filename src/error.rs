// src/error.rs
use thiserror::Error;

use crate::palette::Rgb;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Band dimensions do not match ({}x{}) <-> ({}x{})", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Empty input raster ({width}x{height})")]
    EmptyInput { width: usize, height: usize },
    #[error("Buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("Not enough input bands provided. Required: {required}, provided: {provided}")]
    NotEnoughBands { required: usize, provided: usize },
    #[error("Invalid color ramp: {0}")]
    InvalidRamp(String),
    #[error("No-data color {nodata:?} is reachable by the color ramp at index value {value:.4} ({color:?})")]
    PaletteCollision { nodata: Rgb, color: Rgb, value: f64 },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
