// src/io/writer.rs
use anyhow::{Context, Result};
use gdal::raster::{Buffer, ColorInterpretation, RasterCreationOptions};
use gdal::{Dataset, DriverManager, DriverType, Metadata};
use std::fs;
use std::path::Path;

use super::reader::GeoInfo;
use crate::palette::RgbaImage;
use crate::processing::ClassificationGrid;
use crate::utils::fixed_point::{to_fixed_point, NODATA_VALUE_INT};

/// Write the raw index grid. Fixed-point output is i16 scaled by `scale_factor`
/// with no-data -10000, float output is f32 with NaN no-data.
pub fn write_index(
    grid: &ClassificationGrid,
    geo_info: &GeoInfo,
    output_path: &Path,
    index_name: &str,
    use_fixed_point: bool,
    scale_factor: i32,
) -> Result<()> {
    create_parent_dir(output_path)?;
    let driver = DriverManager::get_output_driver_for_dataset_name(output_path, DriverType::Raster)
        .with_context(|| format!("Unknown output format for {}", output_path.display()))?;

    let creation_options = if driver.short_name() == "GTiff" {
        RasterCreationOptions::from_iter(["COMPRESS=DEFLATE", "TILED=YES", "NUM_THREADS=ALL_CPUS"])
    } else {
        RasterCreationOptions::new()
    };
    let shape = grid.shape();

    if use_fixed_point {
        let encoded = to_fixed_point(grid, scale_factor, NODATA_VALUE_INT)?;
        let mut out_ds = driver.create_with_band_type_with_options::<i16, _>(
            output_path,
            shape.0,
            shape.1,
            1,
            &creation_options,
        )?;
        set_georeference(&mut out_ds, geo_info)?;

        let mut band = out_ds.rasterband(1)?;
        band.set_no_data_value(Some(NODATA_VALUE_INT as f64))?;
        band.set_metadata_item("SCALE", &format!("{}", 1.0 / scale_factor as f64), "")?;
        band.set_metadata_item("OFFSET", "0", "")?;
        band.set_description(&format!("{} (scaled by {})", index_name, scale_factor))?;

        let mut buffer = Buffer::new(shape, encoded);
        band.write((0, 0), shape, &mut buffer)?;
        out_ds.flush_cache()?;
    } else {
        let mut out_ds = driver.create_with_band_type_with_options::<f32, _>(
            output_path,
            shape.0,
            shape.1,
            1,
            &creation_options,
        )?;
        set_georeference(&mut out_ds, geo_info)?;

        let mut band = out_ds.rasterband(1)?;
        band.set_no_data_value(Some(f64::NAN))?;
        band.set_description(index_name)?;

        let mut buffer = Buffer::new(shape, grid.to_f32(f32::NAN));
        band.write((0, 0), shape, &mut buffer)?;
        out_ds.flush_cache()?;
    }

    Ok(())
}

/// Write the rendered RGBA image. Built in memory, then copied to the driver
/// matching the extension, so create-copy only formats like PNG work too.
pub fn write_rgba(image: &RgbaImage, geo_info: &GeoInfo, output_path: &Path) -> Result<()> {
    let shape = image.shape();
    let mem_driver = DriverManager::get_driver_by_name("MEM")?;
    let mut mem_ds = mem_driver.create_with_band_type::<u8, _>("", shape.0, shape.1, 4)?;
    set_georeference(&mut mem_ds, geo_info)?;

    let interpretations = [
        ColorInterpretation::RedBand,
        ColorInterpretation::GreenBand,
        ColorInterpretation::BlueBand,
        ColorInterpretation::AlphaBand,
    ];
    for (channel, interpretation) in interpretations.into_iter().enumerate() {
        let mut band = mem_ds.rasterband(channel + 1)?;
        band.set_color_interpretation(interpretation)?;
        let mut buffer = Buffer::new(shape, image.channel(channel));
        band.write((0, 0), shape, &mut buffer)?;
    }

    create_parent_dir(output_path)?;
    let driver = DriverManager::get_output_driver_for_dataset_name(output_path, DriverType::Raster)
        .with_context(|| format!("Unknown output format for {}", output_path.display()))?;
    let mut out_ds = mem_ds.create_copy(&driver, output_path, &RasterCreationOptions::new())?;
    out_ds.flush_cache()?;

    Ok(())
}

fn create_parent_dir(output_path: &Path) -> Result<()> {
    match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display())),
        _ => Ok(()),
    }
}

fn set_georeference(dataset: &mut Dataset, geo_info: &GeoInfo) -> Result<()> {
    if !geo_info.projection.is_empty() {
        dataset.set_projection(&geo_info.projection)?;
    }
    dataset.set_geo_transform(&geo_info.geo_transform)?;
    Ok(())
}
