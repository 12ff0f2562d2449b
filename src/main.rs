// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use ndvi_calc::batch::{process_batch, process_scene, SceneOutputs};
use ndvi_calc::cli::{Cli, Commands};
use ndvi_calc::config::PaletteConfig;
use ndvi_calc::processing::ParallelProcessor;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let processor = ParallelProcessor::new(cli.threads)?;

    let (index, band_paths) = match (&cli.command, cli.command.index_inputs()) {
        (Commands::Batch { config }, _) => {
            let stats = process_batch(config, &processor)?;
            if cli.stats {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            return Ok(());
        }
        (_, Some(inputs)) => inputs,
        (_, None) => anyhow::bail!("No input bands given"),
    };

    let mut palette = match &cli.palette {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            PaletteConfig::from_json(&json)?
        }
        None => PaletteConfig::default(),
    };
    if cli.transparent_nodata {
        palette.nodata_alpha = Some(0);
    }
    // Fail on a colliding palette before reading any band
    let mapper = palette.build()?;

    let outputs = SceneOutputs {
        index: &cli.output,
        render: cli.render.as_deref(),
        use_fixed_point: !cli.float,
        scale_factor: cli.scale_factor,
    };

    let stats = process_scene(
        &processor,
        index,
        &[band_paths[0].as_path(), band_paths[1].as_path()],
        cli.mask.as_deref(),
        cli.nodata,
        &mapper,
        &outputs,
    )?;

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    println!("Processing complete: {}", cli.output.display());
    if let Some(render) = &cli.render {
        println!("Rendering written: {}", render.display());
    }
    Ok(())
}
