// src/batch.rs
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PaletteConfig;
use crate::io::{read_scene, write_index, write_rgba};
use crate::palette::PaletteMapper;
use crate::processing::indices::SpectralIndex;
use crate::processing::{IndexStats, ParallelProcessor};
use crate::utils::fixed_point::{check_scale_factor, DEFAULT_SCALE_FACTOR, NODATA_VALUE_INT};

#[derive(Deserialize, Serialize, Debug)]
pub struct BatchConfig {
    #[serde(default)]
    pub global: GlobalParams,
    pub operations: Vec<Operation>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GlobalParams {
    #[serde(default)]
    pub float: bool,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: i32,
    #[serde(default)]
    pub nodata: Option<f32>,
    #[serde(default)]
    pub palette: PaletteConfig,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            float: false,
            scale_factor: default_scale_factor(),
            nodata: None,
            palette: PaletteConfig::default(),
        }
    }
}

fn default_scale_factor() -> i32 {
    DEFAULT_SCALE_FACTOR
}

/// One scene, e.g.
///
/// ```json
/// { "index": "ndvi", "bands": { "red": "B04.tif", "nir": "B08.tif" },
///   "output": "ndvi.tif", "render": "ndvi.png" }
/// ```
#[derive(Deserialize, Serialize, Debug)]
pub struct Operation {
    #[serde(flatten)]
    pub index: SpectralIndex,
    /// Band files keyed by role, see [`SpectralIndex::band_roles`]
    pub bands: BTreeMap<String, PathBuf>,
    pub mask: Option<PathBuf>,
    pub output: PathBuf,
    pub render: Option<PathBuf>,
    pub float: Option<bool>,
    pub scale_factor: Option<i32>,
    pub nodata: Option<f32>,
    pub palette: Option<PaletteConfig>,
}

/// Output settings for one scene
pub struct SceneOutputs<'a> {
    pub index: &'a Path,
    pub render: Option<&'a Path>,
    pub use_fixed_point: bool,
    pub scale_factor: i32,
}

/// Read, classify, optionally render, and write one scene. Nothing is written
/// unless classification and rendering both succeed.
pub fn process_scene(
    processor: &ParallelProcessor,
    index: SpectralIndex,
    band_paths: &[&Path],
    mask: Option<&Path>,
    nodata: Option<f32>,
    mapper: &PaletteMapper,
    outputs: &SceneOutputs,
) -> Result<IndexStats> {
    if outputs.use_fixed_point {
        check_scale_factor(outputs.scale_factor, NODATA_VALUE_INT)?;
    }
    let (bands, geo_info) = read_scene(band_paths, mask)?;
    let band_refs: Vec<_> = bands.iter().collect();
    let calculator = index.calculator();

    let stats = match outputs.render {
        Some(render_path) => {
            let output = processor.process(&calculator, &band_refs, nodata, mapper)?;
            write_index(
                &output.classification,
                &geo_info,
                outputs.index,
                index.name(),
                outputs.use_fixed_point,
                outputs.scale_factor,
            )?;
            write_rgba(&output.image, &geo_info, render_path)?;
            output.stats
        }
        None => {
            let (classification, stats) = processor.classify(&calculator, &band_refs, nodata)?;
            write_index(
                &classification,
                &geo_info,
                outputs.index,
                index.name(),
                outputs.use_fixed_point,
                outputs.scale_factor,
            )?;
            stats
        }
    };

    Ok(stats)
}

pub fn process_batch(config_path: &Path, processor: &ParallelProcessor) -> Result<Vec<IndexStats>> {
    // Read and parse configuration file
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: BatchConfig = serde_json::from_str(&config_content)?;

    // Validate the shared palette once, before touching any input
    let global_mapper = config.global.palette.build()?;

    println!("Starting batch processing with {} operations...", config.operations.len());

    let mut all_stats = Vec::with_capacity(config.operations.len());
    for (i, op) in config.operations.iter().enumerate() {
        println!(
            "[{}/{}] Processing {} -> {}",
            i + 1,
            config.operations.len(),
            op.index.name(),
            op.output.display()
        );

        let band_paths = op
            .index
            .band_roles()
            .iter()
            .map(|role| {
                op.bands
                    .get(*role)
                    .map(PathBuf::as_path)
                    .with_context(|| format!("Missing '{}' band for {} operation", role, op.index.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mapper = match &op.palette {
            Some(palette) => palette.build()?,
            None => global_mapper.clone(),
        };

        let outputs = SceneOutputs {
            index: &op.output,
            render: op.render.as_deref(),
            use_fixed_point: !op.float.unwrap_or(config.global.float),
            scale_factor: op.scale_factor.unwrap_or(config.global.scale_factor),
        };

        let stats = process_scene(
            processor,
            op.index,
            &band_paths,
            op.mask.as_deref(),
            op.nodata.or(config.global.nodata),
            &mapper,
            &outputs,
        )
        .with_context(|| format!("Operation {} ({}) failed", i + 1, op.index.name()))?;

        info!("{}: {:?}", op.output.display(), stats);
        all_stats.push(stats);
    }

    println!("Batch processing complete!");
    Ok(all_stats)
}
