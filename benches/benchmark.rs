use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndvi_calc::palette::{PaletteMapper, RampPreset, Rgb};
use ndvi_calc::processing::{compute, ParallelProcessor};
use ndvi_calc::BandGrid;

/// Synthetic 1024x1024 scene with a masked-out border
fn create_scene() -> (BandGrid, BandGrid) {
    let size = (1024, 1024);
    let mut red_data = vec![0.0f32; size.0 * size.1];
    let mut nir_data = vec![0.0f32; size.0 * size.1];

    // Fill with some test values (simulating RED and NIR bands)
    for i in 0..red_data.len() {
        let col = i % size.0;
        if col < 64 {
            red_data[i] = -9999.0;
            nir_data[i] = -9999.0;
            continue;
        }
        red_data[i] = 2500.0 + (i % 50) as f32;
        nir_data[i] = 5000.0 + (i % 100) as f32;
    }

    (
        BandGrid::new(size.0, size.1, red_data).unwrap(),
        BandGrid::new(size.0, size.1, nir_data).unwrap(),
    )
}

/// Benchmark the index classification in isolation
fn benchmark_ndvi_classification(c: &mut Criterion) {
    let (red, nir) = create_scene();

    c.bench_function("ndvi_classification", |b| {
        b.iter(|| compute(black_box(&red), black_box(&nir), Some(-9999.0)))
    });
}

/// Benchmark classification plus rendering
fn benchmark_ndvi_render(c: &mut Criterion) {
    let (red, nir) = create_scene();
    let processor = ParallelProcessor::new(None).unwrap();
    let mapper = PaletteMapper::new(RampPreset::RedYellowGreen.ramp(), Rgb::BLACK, Some(0)).unwrap();
    let ndvi = ndvi_calc::processing::indices::SpectralIndex::Ndvi.calculator();

    c.bench_function("ndvi_classify_and_render", |b| {
        b.iter(|| processor.process(&ndvi, black_box(&[&red, &nir]), Some(-9999.0), &mapper))
    });
}

criterion_group!(benches, benchmark_ndvi_classification, benchmark_ndvi_render);
criterion_main!(benches);
