// src/palette/mapper.rs
use log::debug;
use rayon::prelude::*;

use super::color::{Rgb, RgbaImage};
use super::ramp::{to_channel, ColorRamp};
use crate::error::{Error, Result};
use crate::processing::classification::{ClassificationGrid, PixelClass};

/// Largest per-channel difference (8-bit) at which two colors are considered equal.
pub const COLLISION_TOLERANCE: u8 = 1;

/// Maps classified pixels to RGBA.
///
/// Valid pixels are interpolated on the ramp and fully opaque. No-data pixels get
/// the reserved no-data color with `nodata_alpha`. Construction fails when the
/// ramp can produce the no-data color for any index in [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMapper {
    ramp: ColorRamp,
    nodata_color: Rgb,
    nodata_alpha: u8,
}

impl PaletteMapper {
    pub fn new(ramp: ColorRamp, nodata_color: Rgb, nodata_alpha: Option<u8>) -> Result<Self> {
        check_collision(&ramp, nodata_color)?;
        Ok(Self {
            ramp,
            nodata_color,
            nodata_alpha: nodata_alpha.unwrap_or(u8::MAX),
        })
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn nodata_color(&self) -> Rgb {
        self.nodata_color
    }

    pub fn nodata_alpha(&self) -> u8 {
        self.nodata_alpha
    }

    #[inline]
    pub fn pixel_color(&self, class: PixelClass) -> [u8; 4] {
        match class {
            PixelClass::NoData => {
                let c = self.nodata_color;
                [c.r, c.g, c.b, self.nodata_alpha]
            }
            PixelClass::Valid(value) => {
                let c = self.ramp.color_at(value);
                [c.r, c.g, c.b, u8::MAX]
            }
        }
    }

    /// Render the classification grid, one RGBA pixel per input pixel.
    pub fn render(&self, grid: &ClassificationGrid) -> RgbaImage {
        let (width, height) = grid.shape();
        debug!("rendering {}x{} pixels", width, height);

        // One class per pixel already exists, so the byte count cannot overflow.
        let mut data = vec![0u8; grid.classes().len() * 4];
        if width > 0 {
            data.par_chunks_mut(width * 4)
                .zip(grid.classes().par_chunks(width))
                .for_each(|(out_row, class_row)| {
                    for (px, &class) in out_row.chunks_exact_mut(4).zip(class_row) {
                        px.copy_from_slice(&self.pixel_color(class));
                    }
                });
        }

        RgbaImage::new(width, height, data)
    }
}

/// Convenience wrapper building a one-shot mapper.
pub fn render(
    grid: &ClassificationGrid,
    ramp: &ColorRamp,
    nodata_color: Rgb,
    nodata_alpha: Option<u8>,
) -> Result<RgbaImage> {
    let mapper = PaletteMapper::new(ramp.clone(), nodata_color, nodata_alpha)?;
    Ok(mapper.render(grid))
}

/// Fails with `PaletteCollision` when some index value in [-1, 1] produces a
/// color within [`COLLISION_TOLERANCE`] of `nodata` on every channel.
///
/// Each ramp piece is linear, so per channel the set of positions whose rounded
/// color lands within tolerance is an interval; a collision exists exactly when
/// the three channel intervals overlap inside the piece.
fn check_collision(ramp: &ColorRamp, nodata: Rgb) -> Result<()> {
    // Rounded channel within tolerance <=> unrounded channel within tolerance + 0.5.
    let bound = COLLISION_TOLERANCE as f64 + 0.5;
    let target = nodata.channels().map(|c| c as f64);

    for (lo, hi) in ramp.reachable_segments() {
        let c0 = ramp.components_at(lo);
        let c1 = ramp.components_at(hi);

        let mut t_min: f64 = 0.0;
        let mut t_max: f64 = 1.0;
        for k in 0..3 {
            let delta = c1[k] - c0[k];
            if delta == 0.0 {
                if (c0[k] - target[k]).abs() > bound {
                    t_min = f64::INFINITY;
                }
                continue;
            }
            let a = (target[k] - bound - c0[k]) / delta;
            let b = (target[k] + bound - c0[k]) / delta;
            t_min = t_min.max(a.min(b));
            t_max = t_max.min(a.max(b));
        }

        if t_min <= t_max {
            let t = (t_min + t_max) / 2.0;
            let value = lo + (hi - lo) * t;
            let [r, g, b] = ramp.components_at(value);
            return Err(Error::PaletteCollision {
                nodata,
                color: Rgb::new(to_channel(r), to_channel(g), to_channel(b)),
                value,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ramp::{ColorStop, RampPreset};

    #[test]
    fn ndvi_preset_accepts_black_nodata() {
        assert!(PaletteMapper::new(RampPreset::Ndvi.ramp(), Rgb::BLACK, None).is_ok());
    }

    #[test]
    fn grayscale_rejects_black_nodata() {
        let err = PaletteMapper::new(RampPreset::Grayscale.ramp(), Rgb::BLACK, None).unwrap_err();
        assert!(matches!(err, Error::PaletteCollision { .. }));
    }

    #[test]
    fn collision_inside_segment_is_found() {
        // Passes through (100, 100, 100) halfway, neither endpoint is close.
        let ramp = ColorRamp::new(vec![
            ColorStop::new(-1.0, 0, 0, 0),
            ColorStop::new(1.0, 200, 200, 200),
        ])
        .unwrap();
        match PaletteMapper::new(ramp, Rgb::new(100, 100, 100), None) {
            Err(Error::PaletteCollision { color, value, .. }) => {
                assert!(color.is_close(&Rgb::new(100, 100, 100), COLLISION_TOLERANCE));
                assert!(value.abs() < 0.02);
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn near_miss_is_accepted() {
        // Two channels pass through the target but never at the same position.
        let ramp = ColorRamp::new(vec![
            ColorStop::new(-1.0, 0, 200, 50),
            ColorStop::new(1.0, 200, 0, 50),
        ])
        .unwrap();
        assert!(PaletteMapper::new(ramp, Rgb::new(50, 50, 50), None).is_ok());
    }

    #[test]
    fn unreachable_ramp_part_is_ignored() {
        // Black only beyond the valid index range.
        let ramp = ColorRamp::new(vec![
            ColorStop::new(-3.0, 0, 0, 0),
            ColorStop::new(-1.0, 200, 200, 200),
            ColorStop::new(1.0, 255, 255, 255),
        ])
        .unwrap();
        assert!(PaletteMapper::new(ramp, Rgb::BLACK, None).is_ok());
    }
}
