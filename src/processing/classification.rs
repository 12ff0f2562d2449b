// src/processing/classification.rs
use serde::Serialize;

/// Classification of a single pixel after index computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelClass {
    Valid(f32),
    NoData,
}

impl PixelClass {
    pub fn value(&self) -> Option<f32> {
        match self {
            PixelClass::Valid(v) => Some(*v),
            PixelClass::NoData => None,
        }
    }

    pub fn is_nodata(&self) -> bool {
        matches!(self, PixelClass::NoData)
    }
}

/// Row-major grid of classified pixels, same shape as the input bands.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationGrid {
    width: usize,
    height: usize,
    classes: Vec<PixelClass>,
}

impl ClassificationGrid {
    pub(crate) fn new(width: usize, height: usize, classes: Vec<PixelClass>) -> Self {
        debug_assert_eq!(classes.len(), width * height);
        Self { width, height, classes }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn classes(&self) -> &[PixelClass] {
        &self.classes
    }

    pub fn get(&self, row: usize, col: usize) -> Option<PixelClass> {
        if row < self.height && col < self.width {
            Some(self.classes[row * self.width + col])
        } else {
            None
        }
    }

    /// Raw index values with `nodata_value` written where no index exists.
    pub fn to_f32(&self, nodata_value: f32) -> Vec<f32> {
        self.classes
            .iter()
            .map(|class| class.value().unwrap_or(nodata_value))
            .collect()
    }
}

/// Aggregate statistics over the valid pixels of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexStats {
    pub valid_count: usize,
    pub nodata_count: usize,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub mean: Option<f64>,
}

/// Running accumulator, merged band by band in row order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StatsAccumulator {
    valid_count: usize,
    nodata_count: usize,
    min: f32,
    max: f32,
    sum: f64,
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self {
            valid_count: 0,
            nodata_count: 0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            sum: 0.0,
        }
    }
}

impl StatsAccumulator {
    #[inline]
    pub fn push(&mut self, class: PixelClass) {
        match class {
            PixelClass::Valid(v) => {
                self.valid_count += 1;
                self.min = self.min.min(v);
                self.max = self.max.max(v);
                self.sum += v as f64;
            }
            PixelClass::NoData => self.nodata_count += 1,
        }
    }

    pub fn merge(mut self, other: StatsAccumulator) -> Self {
        self.valid_count += other.valid_count;
        self.nodata_count += other.nodata_count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self
    }

    pub fn finish(self) -> IndexStats {
        if self.valid_count == 0 {
            return IndexStats {
                valid_count: 0,
                nodata_count: self.nodata_count,
                min: None,
                max: None,
                mean: None,
            };
        }

        IndexStats {
            valid_count: self.valid_count,
            nodata_count: self.nodata_count,
            min: Some(self.min),
            max: Some(self.max),
            mean: Some(self.sum / self.valid_count as f64),
        }
    }
}
