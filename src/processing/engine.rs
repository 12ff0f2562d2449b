// src/processing/engine.rs
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::grid::{check_scene, BandGrid};
use crate::processing::classification::{ClassificationGrid, IndexStats, PixelClass, StatsAccumulator};
use crate::processing::indices::NDI;
use crate::processing::parallel::IndexCalculator;

/// Valid index range, computed ratios are clamped to it.
pub const INDEX_RANGE: (f32, f32) = (-1.0, 1.0);

/// Normalized difference of two bands: `(band_b - band_a) / (band_b + band_a)`.
///
/// With `band_a` = Red and `band_b` = NIR this is NDVI, with the red-edge band in
/// place of Red it is NDRE.
pub fn compute(
    band_a: &BandGrid,
    band_b: &BandGrid,
    nodata: Option<f32>,
) -> Result<(ClassificationGrid, IndexStats)> {
    let ndi = NDI::new(1, 0, None);
    classify(&ndi, &[band_a, band_b], nodata)
}

/// Classify every pixel of the scene with `calculator`.
///
/// A pixel is `NoData` when any contributing sample is missing (sentinel, mask,
/// non-finite) or the formula is undefined there. Everything else is `Valid`
/// with the value clamped to [`INDEX_RANGE`].
pub fn classify<C: IndexCalculator + ?Sized>(
    calculator: &C,
    bands: &[&BandGrid],
    nodata: Option<f32>,
) -> Result<(ClassificationGrid, IndexStats)> {
    if bands.len() < calculator.required_bands() {
        return Err(Error::NotEnoughBands {
            required: calculator.required_bands(),
            provided: bands.len(),
        });
    }

    let (width, height) = check_scene(bands)?;
    let bands = &bands[..calculator.required_bands()];
    let rows_per_band = rows_per_band(height);

    debug!(
        "{}: classifying {}x{} pixels in bands of {} rows",
        calculator.name(),
        width,
        height,
        rows_per_band
    );

    let mut classes = vec![PixelClass::NoData; width * height];

    // Each worker owns a disjoint range of rows; partial stats are merged in row order.
    let partials: Vec<StatsAccumulator> = classes
        .par_chunks_mut(width * rows_per_band)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let offset = chunk_idx * width * rows_per_band;
            let mut stats = StatsAccumulator::default();
            let mut samples = Vec::with_capacity(bands.len());

            for (j, class) in chunk.iter_mut().enumerate() {
                let i = offset + j;
                *class = classify_pixel(calculator, bands, i, nodata, &mut samples);
                stats.push(*class);
            }

            stats
        })
        .collect();

    let stats = partials
        .into_iter()
        .fold(StatsAccumulator::default(), StatsAccumulator::merge)
        .finish();

    if stats.valid_count == 0 {
        warn!("{}: no valid pixel in {}x{} scene", calculator.name(), width, height);
    } else {
        debug!(
            "{}: {} valid, {} nodata, min {:?} max {:?} mean {:?}",
            calculator.name(),
            stats.valid_count,
            stats.nodata_count,
            stats.min,
            stats.max,
            stats.mean
        );
    }

    Ok((ClassificationGrid::new(width, height, classes), stats))
}

#[inline]
fn classify_pixel<C: IndexCalculator + ?Sized>(
    calculator: &C,
    bands: &[&BandGrid],
    i: usize,
    nodata: Option<f32>,
    samples: &mut Vec<f32>,
) -> PixelClass {
    samples.clear();
    for band in bands {
        if band.is_nodata_at(i, nodata) {
            return PixelClass::NoData;
        }
        samples.push(band.data()[i]);
    }

    match calculator.index_value(samples) {
        Some(value) if value.is_finite() => {
            PixelClass::Valid(value.clamp(INDEX_RANGE.0 as f64, INDEX_RANGE.1 as f64) as f32)
        }
        // Overflowing or undefined ratios must not leak into the color math.
        _ => PixelClass::NoData,
    }
}

fn rows_per_band(height: usize) -> usize {
    let workers = rayon::current_num_threads().max(1);
    // A few bands per worker to even out load on masked borders.
    height.div_ceil(workers * 4).max(1)
}
