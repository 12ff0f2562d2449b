use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::processing::indices::{SpectralIndex, DEFAULT_SOIL_FACTOR};

#[derive(Parser)]
#[command(name = "ndvi-calc")]
#[command(about = "Vegetation index calculator with no-data safe color rendering")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output index raster path
    #[arg(short, long, default_value = "output.tif", global = true)]
    pub output: PathBuf,

    /// Use float32 instead of int16
    #[arg(long, global = true)]
    pub float: bool,

    /// Scaling factor for fixed-point (at most 10000, so no value encodes as the no-data marker)
    #[arg(long, default_value = "10000", global = true, value_parser = clap::value_parser!(i32).range(1..=10000))]
    pub scale_factor: i32,

    /// Also write a color rendering (PNG or GeoTIFF, picked from the extension)
    #[arg(long, global = true)]
    pub render: Option<PathBuf>,

    /// Palette configuration file (JSON)
    #[arg(long, global = true)]
    pub palette: Option<PathBuf>,

    /// Sample value meaning "not measured", in addition to the bands' own no-data value
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub nodata: Option<f32>,

    /// Mask raster, pixels with value 0 are treated as no data
    #[arg(long, global = true)]
    pub mask: Option<PathBuf>,

    /// Render no-data pixels fully transparent
    #[arg(long, global = true)]
    pub transparent_nodata: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Print index statistics as JSON
    #[arg(long, global = true)]
    pub stats: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalized Difference Vegetation Index: (NIR-RED)/(NIR+RED)
    Ndvi {
        /// Red band
        #[arg(short = 'r', long)]
        red: PathBuf,

        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,
    },

    /// Normalized Difference Red Edge index: (NIR-REDEDGE)/(NIR+REDEDGE)
    Ndre {
        /// Red-edge band
        #[arg(short = 'e', long)]
        red_edge: PathBuf,

        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,
    },

    /// Green NDVI: (NIR-GREEN)/(NIR+GREEN)
    Gndvi {
        /// Green band
        #[arg(short = 'g', long)]
        green: PathBuf,

        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,
    },

    /// Normalized Difference Water Index: (GREEN-NIR)/(GREEN+NIR)
    Ndwi {
        /// Green band
        #[arg(short = 'g', long)]
        green: PathBuf,

        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,
    },

    /// Normalized Burn Ratio: (NIR-SWIR)/(NIR+SWIR)
    Nbr {
        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,

        /// SWIR band - typically Sentinel-2 B12
        #[arg(short = 's', long)]
        swir: PathBuf,
    },

    /// Generic normalized difference: (B-A)/(B+A)
    Nd {
        /// Subtracted band (A)
        #[arg(short = 'a', long)]
        band_a: PathBuf,

        /// Dominant band (B)
        #[arg(short = 'b', long)]
        band_b: PathBuf,
    },

    /// Soil Adjusted Vegetation Index, expects reflectance (0..1) inputs
    Savi {
        /// NIR band
        #[arg(short = 'n', long)]
        nir: PathBuf,

        /// Red band
        #[arg(short = 'r', long)]
        red: PathBuf,

        /// Soil adjustment factor (default: 0.5)
        #[arg(short = 'l', long, default_value_t = DEFAULT_SOIL_FACTOR)]
        soil_factor: f32,
    },

    /// Run several operations from a JSON configuration file
    Batch {
        /// Batch configuration file
        config: PathBuf,
    },
}

impl Commands {
    /// Index and input bands in calculator order, `None` for batch runs.
    pub fn index_inputs(&self) -> Option<(SpectralIndex, [PathBuf; 2])> {
        match self {
            Commands::Ndvi { red, nir } => Some((SpectralIndex::Ndvi, [red.clone(), nir.clone()])),
            Commands::Ndre { red_edge, nir } => Some((SpectralIndex::Ndre, [red_edge.clone(), nir.clone()])),
            Commands::Gndvi { green, nir } => Some((SpectralIndex::Gndvi, [green.clone(), nir.clone()])),
            Commands::Ndwi { green, nir } => Some((SpectralIndex::Ndwi, [nir.clone(), green.clone()])),
            Commands::Nbr { nir, swir } => Some((SpectralIndex::Nbr, [swir.clone(), nir.clone()])),
            Commands::Nd { band_a, band_b } => Some((SpectralIndex::Nd, [band_a.clone(), band_b.clone()])),
            Commands::Savi { nir, red, soil_factor } => Some((
                SpectralIndex::Savi {
                    soil_factor: *soil_factor,
                },
                [red.clone(), nir.clone()],
            )),
            Commands::Batch { .. } => None,
        }
    }
}
