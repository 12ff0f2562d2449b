// src/processing/indices/savi.rs
use crate::processing::parallel::IndexCalculator;

/// Soil Adjusted Vegetation Index (SAVI) calculator
pub struct SAVI {
    nir_index: usize,
    red_index: usize,
    soil_factor: f32,
    name: String,
}

impl SAVI {
    pub fn new(nir_index: usize, red_index: usize, soil_factor: f32, name: Option<String>) -> Self {
        Self {
            nir_index,
            red_index,
            soil_factor,
            name: name.unwrap_or_else(|| "SAVI".to_string()),
        }
    }

    pub fn soil_factor(&self) -> f32 {
        self.soil_factor
    }
}

impl IndexCalculator for SAVI {
    fn index_value(&self, samples: &[f32]) -> Option<f64> {
        let nir = samples[self.nir_index] as f64;
        let red = samples[self.red_index] as f64;
        let l = self.soil_factor as f64;

        // SAVI = ((NIR - RED) / (NIR + RED + L)) * (1 + L)
        // Reflectance inputs are expected (0..1), L is meaningless on raw DN values.
        let denominator = nir + red + l;
        if denominator == 0.0 {
            return None;
        }

        Some(((nir - red) / denominator) * (1.0 + l))
    }

    fn required_bands(&self) -> usize {
        self.nir_index.max(self.red_index) + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}
