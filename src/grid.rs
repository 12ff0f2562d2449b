// src/grid.rs
use crate::error::{Error, Result};

/// Per-pixel validity mask, `true` marks a pixel as masked out.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    masked: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize, masked: Vec<bool>) -> Result<Self> {
        check_buffer(width, height, masked.len())?;
        Ok(Self { width, height, masked })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn is_masked(&self, i: usize) -> bool {
        self.masked[i]
    }
}

/// A single spectral band: row-major f32 samples plus its no-data description.
#[derive(Debug, Clone, PartialEq)]
pub struct BandGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
    nodata: Option<f32>,
    mask: Option<Mask>,
}

impl BandGrid {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        check_buffer(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
            nodata: None,
            mask: None,
        })
    }

    /// Build a grid from nested rows, mostly useful for small scenes and tests.
    pub fn from_rows(rows: &[&[f32]]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(grid_len(width, height)?);
        for row in rows {
            if row.len() != width {
                return Err(Error::DimensionMismatch {
                    expected: (width, height),
                    actual: (row.len(), height),
                });
            }
            data.extend_from_slice(row);
        }

        Self::new(width, height, data)
    }

    pub fn with_nodata(mut self, nodata: Option<f32>) -> Self {
        self.nodata = nodata;
        self
    }

    pub fn with_mask(mut self, mask: Mask) -> Result<Self> {
        if mask.shape() != self.shape() {
            return Err(Error::DimensionMismatch {
                expected: self.shape(),
                actual: mask.shape(),
            });
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// (width, height)
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// True when the sample at linear index `i` carries no measurement, either
    /// through this grid's own sentinel, its mask, the request sentinel or a
    /// non-finite value.
    #[inline]
    pub fn is_nodata_at(&self, i: usize, sentinel: Option<f32>) -> bool {
        let value = self.data[i];
        !value.is_finite()
            || matches_sentinel(value, self.nodata)
            || matches_sentinel(value, sentinel)
            || self.mask.as_ref().is_some_and(|m| m.is_masked(i))
    }
}

#[inline]
fn matches_sentinel(value: f32, sentinel: Option<f32>) -> bool {
    match sentinel {
        Some(nd) if nd.is_nan() => value.is_nan(),
        Some(nd) => value == nd,
        None => false,
    }
}

fn check_buffer(width: usize, height: usize, len: usize) -> Result<()> {
    let expected = grid_len(width, height)?;
    if len != expected {
        return Err(Error::BufferSize { expected, actual: len });
    }
    Ok(())
}

/// Pixel count of a `width` x `height` grid.
pub(crate) fn grid_len(width: usize, height: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidArgument(format!("grid of {width}x{height} pixels is too large")))
}

/// Verify that every band shares the shape of the first and that the scene is not empty.
pub(crate) fn check_scene(bands: &[&BandGrid]) -> Result<(usize, usize)> {
    let Some(first) = bands.first() else {
        return Err(Error::NotEnoughBands {
            required: 1,
            provided: 0,
        });
    };

    let shape = first.shape();
    for band in &bands[1..] {
        if band.shape() != shape {
            return Err(Error::DimensionMismatch {
                expected: shape,
                actual: band.shape(),
            });
        }
    }

    if shape.0 == 0 || shape.1 == 0 {
        return Err(Error::EmptyInput {
            width: shape.0,
            height: shape.1,
        });
    }

    Ok(shape)
}
