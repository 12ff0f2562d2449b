// tests/palette_tests.rs
use ndvi_calc::config::{PaletteConfig, RampSpec};
use ndvi_calc::palette::{render, ColorRamp, ColorStop, PaletteMapper, RampPreset, Rgb, Rgba};
use ndvi_calc::processing::{compute, ParallelProcessor};
use ndvi_calc::{BandGrid, Error};

fn reference_bands() -> (BandGrid, BandGrid) {
    (
        BandGrid::from_rows(&[&[0.1, 0.2], &[0.0, 0.0]]).unwrap(),
        BandGrid::from_rows(&[&[0.3, 0.4], &[0.0, 5.0]]).unwrap(),
    )
}

/// Two-segment ramp with a breakpoint at 0.5
fn test_ramp() -> ColorRamp {
    ColorRamp::new(vec![
        ColorStop::new(-1.0, 200, 0, 0),
        ColorStop::new(0.5, 255, 255, 0),
        ColorStop::new(1.0, 0, 160, 0),
    ])
    .unwrap()
}

#[test]
fn test_reference_scene_rendering() {
    let (band_a, band_b) = reference_bands();
    let (grid, _) = compute(&band_a, &band_b, Some(-9999.0)).unwrap();
    let mapper = PaletteMapper::new(RampPreset::Ndvi.ramp(), Rgb::BLACK, Some(0)).unwrap();

    let image = mapper.render(&grid);
    assert_eq!(image.shape(), (2, 2));
    assert_eq!(image.as_bytes().len(), 16);

    // NoData: reserved color, own alpha
    assert_eq!(image.pixel(1, 0), Some(Rgba { r: 0, g: 0, b: 0, a: 0 }));
    // Valid(1.0): top of the ramp, opaque
    assert_eq!(image.pixel(1, 1), Some(Rgb::new(34, 139, 34).with_alpha(255)));
    // Valid(0.5): halfway between gold and forest green
    let mid = image.pixel(0, 0).unwrap();
    assert_eq!(mid.a, 255);
    assert!(mid.rgb().is_close(&Rgb::new(145, 177, 17), 1), "{mid:?}");
}

#[test]
fn test_breakpoint_yields_exact_color() {
    let ramp = test_ramp();
    for stop in ramp.stops() {
        assert_eq!(ramp.color_at(stop.value), stop.color);
    }

    let rdylgn = RampPreset::RedYellowGreen.ramp();
    for stop in rdylgn.stops() {
        assert_eq!(rdylgn.color_at(stop.value), stop.color, "at {}", stop.value);
    }
}

#[test]
fn test_ndvi_legend() {
    let legend = RampPreset::Ndvi.ramp().legend();
    assert_eq!(
        legend,
        vec![
            (-1.0, Rgb::new(165, 42, 42)),
            (0.0, Rgb::new(255, 215, 0)),
            (1.0, Rgb::new(34, 139, 34)),
        ]
    );
    assert_eq!(legend[2].1.channels(), [34, 139, 34]);
}

#[test]
fn test_interpolation_between_stops() {
    let ramp = test_ramp();
    // Halfway between -1.0 and 0.5
    assert_eq!(ramp.color_at(-0.25), Rgb::new(228, 128, 0));
    // Halfway between 0.5 and 1.0
    assert_eq!(ramp.color_at(0.75), Rgb::new(128, 208, 0));
}

#[test]
fn test_invalid_ramps() {
    let single = ColorRamp::new(vec![ColorStop::new(0.0, 1, 2, 3)]);
    assert!(matches!(single, Err(Error::InvalidRamp(_))));

    let unordered = ColorRamp::new(vec![
        ColorStop::new(0.5, 1, 2, 3),
        ColorStop::new(-0.5, 4, 5, 6),
    ]);
    assert!(matches!(unordered, Err(Error::InvalidRamp(_))));

    let duplicate = ColorRamp::new(vec![
        ColorStop::new(0.0, 1, 2, 3),
        ColorStop::new(0.0, 4, 5, 6),
        ColorStop::new(1.0, 7, 8, 9),
    ]);
    assert!(matches!(duplicate, Err(Error::InvalidRamp(_))));

    let nan = ColorRamp::new(vec![ColorStop::new(f32::NAN, 1, 2, 3), ColorStop::new(1.0, 4, 5, 6)]);
    assert!(matches!(nan, Err(Error::InvalidRamp(_))));
}

#[test]
fn test_collision_with_endpoint_is_rejected() {
    let err = PaletteMapper::new(test_ramp(), Rgb::new(199, 1, 0), None).unwrap_err();
    assert!(matches!(err, Error::PaletteCollision { .. }), "{err:?}");
}

/// Exhaustive sweep: whenever construction succeeds no sampled value renders
/// to the no-data color
#[test]
fn test_accepted_palettes_never_produce_nodata_color() {
    let candidates = [
        Rgb::BLACK,
        Rgb::new(255, 255, 255),
        Rgb::new(255, 0, 255),
        Rgb::new(228, 128, 0),
        Rgb::new(128, 208, 0),
        Rgb::new(254, 250, 0),
    ];

    for nodata in candidates {
        let Ok(mapper) = PaletteMapper::new(test_ramp(), nodata, None) else {
            continue;
        };
        for i in 0..=20_000 {
            let value = -1.0 + i as f32 / 10_000.0;
            let color = mapper.ramp().color_at(value);
            assert!(!color.is_close(&nodata, 1), "{nodata:?} produced at {value}");
        }
    }
}

#[test]
fn test_sample_on_ramp_is_rejected() {
    for value in [-0.9, -0.25, 0.1, 0.5, 0.99] {
        let nodata = test_ramp().color_at(value);
        let result = PaletteMapper::new(test_ramp(), nodata, None);
        assert!(matches!(result, Err(Error::PaletteCollision { .. })), "{value}: {result:?}");
    }
}

#[test]
fn test_render_is_idempotent() {
    let (band_a, band_b) = reference_bands();
    let (grid, _) = compute(&band_a, &band_b, None).unwrap();

    let first = render(&grid, &test_ramp(), Rgb::new(255, 0, 255), None).unwrap();
    let second = render(&grid, &test_ramp(), Rgb::new(255, 0, 255), None).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.pixel(1, 0), Some(Rgba { r: 255, g: 0, b: 255, a: 255 }));
}

#[test]
fn test_render_refuses_colliding_palette() {
    let (band_a, band_b) = reference_bands();
    let (grid, _) = compute(&band_a, &band_b, None).unwrap();

    let result = render(&grid, &RampPreset::Grayscale.ramp(), Rgb::BLACK, None);
    assert!(matches!(result, Err(Error::PaletteCollision { .. })));
}

#[test]
fn test_processor_output() {
    let (band_a, band_b) = reference_bands();
    let processor = ParallelProcessor::new(Some(2)).unwrap();
    let mapper = PaletteMapper::new(RampPreset::Ndvi.ramp(), Rgb::BLACK, None).unwrap();
    let ndvi = ndvi_calc::processing::indices::SpectralIndex::Ndvi.calculator();

    let output = processor.process(&ndvi, &[&band_a, &band_b], None, &mapper).unwrap();
    assert_eq!(output.stats.valid_count, 3);
    assert_eq!(output.image.shape(), output.classification.shape());
    assert_eq!(output.image.pixel(1, 0), Some(Rgb::BLACK.with_alpha(255)));
}

#[test]
fn test_processor_rejects_mismatch() {
    let band_a = BandGrid::new(2, 2, vec![0.1; 4]).unwrap();
    let band_b = BandGrid::new(3, 2, vec![0.2; 6]).unwrap();
    let processor = ParallelProcessor::new(Some(2)).unwrap();
    let mapper = PaletteMapper::new(RampPreset::Ndvi.ramp(), Rgb::BLACK, None).unwrap();
    let ndvi = ndvi_calc::processing::indices::SpectralIndex::Ndvi.calculator();

    let result = processor.process(&ndvi, &[&band_a, &band_b], None, &mapper);
    assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
}

#[test]
fn test_palette_config_defaults() {
    let config = PaletteConfig::from_json("{}").unwrap();
    assert_eq!(config.ramp, RampSpec::Preset(RampPreset::Ndvi));
    assert_eq!(config.nodata_color, Rgb::BLACK);
    assert!(config.build().is_ok());
}

#[test]
fn test_palette_config_custom_stops() {
    let json = r#"{
        "ramp": [
            { "value": -1.0, "color": [0, 0, 255] },
            { "value": 1.0, "color": [0, 255, 0] }
        ],
        "nodata_color": [255, 0, 0],
        "nodata_alpha": 0
    }"#;
    let config = PaletteConfig::from_json(json).unwrap();
    let mapper = config.build().unwrap();

    assert_eq!(mapper.nodata_color(), Rgb::new(255, 0, 0));
    assert_eq!(mapper.nodata_alpha(), 0);
    assert_eq!(mapper.ramp().color_at(1.0), Rgb::new(0, 255, 0));
}

#[test]
fn test_palette_config_collision_is_reported() {
    let config = PaletteConfig::from_json(r#"{ "ramp": "grayscale", "nodata_color": [255, 255, 255] }"#).unwrap();
    assert!(matches!(config.build(), Err(Error::PaletteCollision { .. })));
}

#[test]
fn test_palette_config_invalid_json() {
    assert!(matches!(
        PaletteConfig::from_json(r#"{ "ramp": "rainbow" }"#),
        Err(Error::InvalidArgument(_))
    ));
}
