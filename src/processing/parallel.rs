// src/processing/parallel.rs
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};
use crate::grid::BandGrid;
use crate::palette::{PaletteMapper, RgbaImage};
use crate::processing::classification::{ClassificationGrid, IndexStats};
use crate::processing::engine::classify;

/// Everything one request produces. Built only when classification and
/// rendering both succeed.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub classification: ClassificationGrid,
    pub stats: IndexStats,
    pub image: RgbaImage,
}

pub struct ParallelProcessor {
    threads: usize,
    pool: ThreadPool,
}

impl ParallelProcessor {
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let threads = threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("ndvi-worker-{i}"))
            .build()
            .map_err(|e| Error::InvalidArgument(format!("Failed to create thread pool: {e}")))?;

        Ok(Self { threads, pool })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Classify the scene without rendering.
    pub fn classify<I: IndexCalculator + ?Sized>(
        &self,
        calculator: &I,
        bands: &[&BandGrid],
        nodata: Option<f32>,
    ) -> Result<(ClassificationGrid, IndexStats)> {
        self.pool.install(|| classify(calculator, bands, nodata))
    }

    /// Classify and render one scene on this processor's pool.
    pub fn process<I: IndexCalculator + ?Sized>(
        &self,
        calculator: &I,
        bands: &[&BandGrid],
        nodata: Option<f32>,
        mapper: &PaletteMapper,
    ) -> Result<RenderOutput> {
        debug!("processing {} on {} threads", calculator.name(), self.threads);

        self.pool.install(|| {
            let (classification, stats) = classify(calculator, bands, nodata)?;
            let image = mapper.render(&classification);
            Ok(RenderOutput {
                classification,
                stats,
                image,
            })
        })
    }
}

/// Trait for spectral index calculators
pub trait IndexCalculator: Send + Sync {
    /// Index value for one pixel from its band samples (in input order),
    /// `None` where the formula is undefined. Evaluated in f64 so finite f32
    /// inputs never overflow the intermediate terms.
    fn index_value(&self, samples: &[f32]) -> Option<f64>;

    /// Return the number of required input bands
    fn required_bands(&self) -> usize;

    /// Return the name of the index
    fn name(&self) -> &str;
}

impl<T: IndexCalculator + ?Sized> IndexCalculator for Box<T> {
    fn index_value(&self, samples: &[f32]) -> Option<f64> {
        (**self).index_value(samples)
    }

    fn required_bands(&self) -> usize {
        (**self).required_bands()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
