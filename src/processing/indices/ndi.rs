// src/processing/indices/ndi.rs
use crate::processing::parallel::IndexCalculator;

/// Normalized Difference Index (NDI) calculator: `(P - N) / (P + N)`
///
/// `positive_index` and `negative_index` select the input bands. NDVI, NDRE,
/// GNDVI, NDWI and NBR are all instances with a different band pair.
pub struct NDI {
    positive_index: usize,
    negative_index: usize,
    name: String,
}

impl NDI {
    pub fn new(positive_index: usize, negative_index: usize, name: Option<String>) -> Self {
        Self {
            positive_index,
            negative_index,
            name: name.unwrap_or_else(|| "NDI".to_string()),
        }
    }
}

impl IndexCalculator for NDI {
    fn index_value(&self, samples: &[f32]) -> Option<f64> {
        let p = samples[self.positive_index] as f64;
        let n = samples[self.negative_index] as f64;

        let denominator = p + n;
        if denominator == 0.0 {
            // Undefined ratio, never a valid index.
            return None;
        }

        Some((p - n) / denominator)
    }

    fn required_bands(&self) -> usize {
        self.positive_index.max(self.negative_index) + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}
