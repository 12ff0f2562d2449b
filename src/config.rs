// src/config.rs
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::palette::{ColorRamp, ColorStop, PaletteMapper, RampPreset, Rgb};

/// Either a named preset or explicit stops.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RampSpec {
    Preset(RampPreset),
    Stops(Vec<ColorStop>),
}

impl Default for RampSpec {
    fn default() -> Self {
        RampSpec::Preset(RampPreset::Ndvi)
    }
}

impl RampSpec {
    pub fn build(&self) -> Result<ColorRamp> {
        match self {
            RampSpec::Preset(preset) => Ok(preset.ramp()),
            RampSpec::Stops(stops) => ColorRamp::new(stops.clone()),
        }
    }
}

/// Palette configuration, e.g.
///
/// ```json
/// { "ramp": "ndvi", "nodata_color": [0, 0, 0], "nodata_alpha": 0 }
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PaletteConfig {
    #[serde(default)]
    pub ramp: RampSpec,
    #[serde(default = "default_nodata_color")]
    pub nodata_color: Rgb,
    #[serde(default)]
    pub nodata_alpha: Option<u8>,
}

fn default_nodata_color() -> Rgb {
    Rgb::BLACK
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            ramp: RampSpec::default(),
            nodata_color: default_nodata_color(),
            nodata_alpha: None,
        }
    }
}

impl PaletteConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidArgument(format!("Invalid palette configuration: {e}")))
    }

    /// Validate the ramp and the no-data color against it.
    pub fn build(&self) -> Result<PaletteMapper> {
        PaletteMapper::new(self.ramp.build()?, self.nodata_color, self.nodata_alpha)
    }
}
