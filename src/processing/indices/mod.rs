// src/processing/indices/mod.rs
pub mod ndi;
pub mod savi;

// Re-export indices
pub use ndi::NDI;
pub use savi::SAVI;

use serde::{Deserialize, Serialize};

use crate::processing::parallel::IndexCalculator;

/// Default soil adjustment factor for SAVI
pub const DEFAULT_SOIL_FACTOR: f32 = 0.5;

/// Index formula selector.
///
/// Band order of the calculator inputs is given by [`SpectralIndex::band_roles`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "index")]
pub enum SpectralIndex {
    /// (NIR - Red) / (NIR + Red)
    Ndvi,
    /// (NIR - RedEdge) / (NIR + RedEdge)
    Ndre,
    /// (NIR - Green) / (NIR + Green)
    Gndvi,
    /// (Green - NIR) / (Green + NIR), McFeeters
    Ndwi,
    /// (NIR - SWIR) / (NIR + SWIR)
    Nbr,
    /// Generic (B - A) / (B + A) over any two bands
    Nd,
    /// ((NIR - Red) / (NIR + Red + L)) * (1 + L)
    Savi {
        #[serde(default = "default_soil_factor")]
        soil_factor: f32,
    },
}

fn default_soil_factor() -> f32 {
    DEFAULT_SOIL_FACTOR
}

impl SpectralIndex {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ndvi => "NDVI",
            Self::Ndre => "NDRE",
            Self::Gndvi => "GNDVI",
            Self::Ndwi => "NDWI",
            Self::Nbr => "NBR",
            Self::Nd => "ND",
            Self::Savi { .. } => "SAVI",
        }
    }

    /// Names of the bands the calculator expects, in input order.
    pub fn band_roles(&self) -> [&'static str; 2] {
        match self {
            Self::Ndvi | Self::Savi { .. } => ["red", "nir"],
            Self::Ndre => ["red_edge", "nir"],
            Self::Gndvi => ["green", "nir"],
            Self::Ndwi => ["nir", "green"],
            Self::Nbr => ["swir", "nir"],
            Self::Nd => ["band_a", "band_b"],
        }
    }

    /// Calculator with inputs ordered as [`band_roles`](Self::band_roles):
    /// the subtracted band first, the dominant band second.
    pub fn calculator(&self) -> Box<dyn IndexCalculator> {
        let name = Some(self.name().to_string());
        match *self {
            Self::Savi { soil_factor } => Box::new(SAVI::new(1, 0, soil_factor, name)),
            _ => Box::new(NDI::new(1, 0, name)),
        }
    }
}
