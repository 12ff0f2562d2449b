// src/palette/ramp.rs
//! Ordered color ramps and piecewise linear interpolation.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::error::{Error, Result};
use crate::processing::engine::INDEX_RANGE;

/// A control point: index value mapped to a color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(value: f32, r: u8, g: u8, b: u8) -> Self {
        Self {
            value,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Built-in ramps over the [-1, 1] index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RampPreset {
    /// Brown -> Gold -> Forest green
    Ndvi,
    /// Red -> Orange -> Pale yellow -> Light green -> Green
    RedYellowGreen,
    /// Black -> White
    Grayscale,
}

const NDVI_STOPS: &[ColorStop] = &[
    ColorStop::new(-1.0, 165, 42, 42),
    ColorStop::new(0.0, 255, 215, 0),
    ColorStop::new(1.0, 34, 139, 34),
];

const RED_YELLOW_GREEN_STOPS: &[ColorStop] = &[
    ColorStop::new(-1.0, 215, 25, 28),
    ColorStop::new(0.0, 253, 174, 97),
    ColorStop::new(0.3, 255, 255, 191),
    ColorStop::new(0.6, 166, 217, 106),
    ColorStop::new(1.0, 26, 150, 65),
];

const GRAYSCALE_STOPS: &[ColorStop] = &[
    ColorStop::new(-1.0, 0, 0, 0),
    ColorStop::new(1.0, 255, 255, 255),
];

impl RampPreset {
    pub const ALL: &[RampPreset] = &[Self::Ndvi, Self::RedYellowGreen, Self::Grayscale];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ndvi => "ndvi",
            Self::RedYellowGreen => "red-yellow-green",
            Self::Grayscale => "grayscale",
        }
    }

    pub fn ramp(&self) -> ColorRamp {
        let stops = match self {
            Self::Ndvi => NDVI_STOPS,
            Self::RedYellowGreen => RED_YELLOW_GREEN_STOPS,
            Self::Grayscale => GRAYSCALE_STOPS,
        };
        // Presets are strictly increasing by construction.
        ColorRamp {
            stops: stops.to_vec(),
        }
    }
}

/// Validated color ramp: at least two stops with strictly increasing, finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::InvalidRamp(format!(
                "at least 2 stops required, got {}",
                stops.len()
            )));
        }

        if let Some(stop) = stops.iter().find(|s| !s.value.is_finite()) {
            return Err(Error::InvalidRamp(format!("non-finite breakpoint {}", stop.value)));
        }

        if let Some((a, b)) = stops.iter().tuple_windows().find(|(a, b)| a.value >= b.value) {
            return Err(Error::InvalidRamp(format!(
                "breakpoints must be strictly increasing ({} >= {})",
                a.value, b.value
            )));
        }

        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Legend entries for display, one per breakpoint.
    pub fn legend(&self) -> Vec<(f32, Rgb)> {
        self.stops.iter().map(|s| (s.value, s.color)).collect()
    }

    /// Color for `value`. Values at or beyond the end stops take the end colors,
    /// a value equal to a breakpoint yields exactly that breakpoint's color.
    pub fn color_at(&self, value: f32) -> Rgb {
        let [r, g, b] = self.components_at(value as f64);
        Rgb::new(to_channel(r), to_channel(g), to_channel(b))
    }

    /// Unrounded channel values at `value`.
    pub(crate) fn components_at(&self, value: f64) -> [f64; 3] {
        let idx = self.stops.partition_point(|s| s.value as f64 <= value);
        if idx == 0 {
            return components(self.stops[0].color);
        }
        if idx == self.stops.len() {
            return components(self.stops[idx - 1].color);
        }

        let lower = &self.stops[idx - 1];
        let upper = &self.stops[idx];
        let t = (value - lower.value as f64) / (upper.value as f64 - lower.value as f64);
        lerp_components(components(lower.color), components(upper.color), t)
    }

    /// Linear pieces of the ramp reachable from the valid index range, as
    /// `(value_lo, value_hi)` pairs. Clamped regions show up as constant pieces.
    pub(crate) fn reachable_segments(&self) -> Vec<(f64, f64)> {
        let (range_lo, range_hi) = (INDEX_RANGE.0 as f64, INDEX_RANGE.1 as f64);
        let first = self.stops[0].value as f64;
        let last = self.stops[self.stops.len() - 1].value as f64;

        let mut segments = Vec::with_capacity(self.stops.len() + 1);
        if first > range_lo {
            segments.push((range_lo, first.min(range_hi)));
        }
        for (a, b) in self.stops.iter().tuple_windows() {
            let lo = (a.value as f64).max(range_lo);
            let hi = (b.value as f64).min(range_hi);
            if lo <= hi {
                segments.push((lo, hi));
            }
        }
        if last < range_hi {
            segments.push((last.max(range_lo), range_hi));
        }

        segments
    }
}

fn components(c: Rgb) -> [f64; 3] {
    [c.r as f64, c.g as f64, c.b as f64]
}

fn lerp_components(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[inline]
pub(crate) fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndvi_preset_endpoints() {
        let ramp = RampPreset::Ndvi.ramp();
        assert_eq!(ramp.color_at(-1.0), Rgb::new(165, 42, 42));
        assert_eq!(ramp.color_at(0.0), Rgb::new(255, 215, 0));
        assert_eq!(ramp.color_at(1.0), Rgb::new(34, 139, 34));
    }

    #[test]
    fn clamps_beyond_extremes() {
        let ramp = ColorRamp::new(vec![
            ColorStop::new(-0.5, 10, 20, 30),
            ColorStop::new(0.5, 200, 100, 50),
        ])
        .unwrap();
        assert_eq!(ramp.color_at(-1.0), Rgb::new(10, 20, 30));
        assert_eq!(ramp.color_at(1.0), Rgb::new(200, 100, 50));
    }

    #[test]
    fn grayscale_midpoint() {
        let ramp = RampPreset::Grayscale.ramp();
        assert_eq!(ramp.color_at(0.0), Rgb::new(128, 128, 128));
    }

    #[test]
    fn presets_are_valid_ramps() {
        for preset in RampPreset::ALL {
            let ramp = preset.ramp();
            assert!(ColorRamp::new(ramp.stops().to_vec()).is_ok(), "{}", preset.name());
        }
    }

    #[test]
    fn reachable_segments_clip_to_index_range() {
        let ramp = ColorRamp::new(vec![
            ColorStop::new(-2.0, 0, 0, 0),
            ColorStop::new(0.0, 100, 100, 100),
            ColorStop::new(0.5, 200, 200, 200),
        ])
        .unwrap();
        assert_eq!(
            ramp.reachable_segments(),
            vec![(-1.0, 0.0), (0.0, 0.5), (0.5, 1.0)]
        );
    }
}
