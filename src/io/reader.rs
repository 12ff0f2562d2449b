// src/io/reader.rs
use anyhow::{Context, Result};
use gdal::Dataset;
use std::path::Path;

use crate::error::Error;
use crate::grid::{BandGrid, Mask};

/// Georeferencing carried from the first input to the outputs.
#[derive(Debug, Clone)]
pub struct GeoInfo {
    pub projection: String,
    pub geo_transform: [f64; 6],
    pub width: usize,
    pub height: usize,
}

/// Read band 1 of `path` as f32. The band's no-data value becomes the grid sentinel.
pub fn read_band(path: &Path) -> Result<(BandGrid, GeoInfo)> {
    let dataset = Dataset::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let (width, height) = dataset.raster_size();
    let band = dataset.rasterband(1)?;
    let nodata = band.no_data_value().map(|v| v as f32);

    let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;
    let (_, data) = buffer.into_shape_and_vec();

    let geo_info = GeoInfo {
        projection: dataset.projection(),
        geo_transform: dataset.geo_transform()?,
        width,
        height,
    };

    let grid = BandGrid::new(width, height, data)?.with_nodata(nodata);
    Ok((grid, geo_info))
}

/// Read a mask raster, GDAL mask convention: 0 means no data.
pub fn read_mask(path: &Path) -> Result<Mask> {
    let dataset = Dataset::open(path).with_context(|| format!("Failed to open mask {}", path.display()))?;
    let (width, height) = dataset.raster_size();
    let band = dataset.rasterband(1)?;

    let buffer = band.read_as::<u8>((0, 0), (width, height), (width, height), None)?;
    let masked = buffer.data().iter().map(|&v| v == 0).collect();

    Ok(Mask::new(width, height, masked)?)
}

/// Read all bands of a scene, attaching the optional mask to each of them.
pub fn read_scene(paths: &[&Path], mask: Option<&Path>) -> Result<(Vec<BandGrid>, GeoInfo)> {
    let mask = mask.map(read_mask).transpose()?;

    let mut bands = Vec::with_capacity(paths.len());
    let mut geo: Option<GeoInfo> = None;
    for path in paths {
        let (mut grid, info) = read_band(path)?;
        let reference = geo.get_or_insert(info);
        if grid.shape() != (reference.width, reference.height) {
            return Err(Error::DimensionMismatch {
                expected: (reference.width, reference.height),
                actual: grid.shape(),
            })
            .with_context(|| format!("{} does not match the first band", path.display()));
        }
        if let Some(mask) = &mask {
            grid = grid
                .with_mask(mask.clone())
                .with_context(|| format!("Mask does not match {}", path.display()))?;
        }
        bands.push(grid);
    }

    let geo = geo.context("No input bands given")?;
    Ok((bands, geo))
}
