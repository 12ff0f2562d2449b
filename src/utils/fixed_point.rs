// src/utils/fixed_point.rs
use crate::error::{Error, Result};
use crate::processing::{ClassificationGrid, PixelClass};

/// Default scale applied to index values stored as i16
pub const DEFAULT_SCALE_FACTOR: i32 = 10000;
/// Largest scale whose encoded range stays clear of the no-data marker
pub const MAX_SCALE_FACTOR: i32 = 10000;
/// No-data marker of the i16 encoding, outside the scaled index range
pub const NODATA_VALUE_INT: i16 = -10000;

/// Reject scales that are non-positive or large enough for a valid index to
/// encode to the same integer as `nodata_value`.
pub fn check_scale_factor(scale_factor: i32, nodata_value: i16) -> Result<()> {
    if !(1..=MAX_SCALE_FACTOR).contains(&scale_factor) {
        return Err(Error::InvalidArgument(format!(
            "scale factor {scale_factor} outside 1..={MAX_SCALE_FACTOR}"
        )));
    }
    if (nodata_value as i32).abs() < scale_factor {
        return Err(Error::InvalidArgument(format!(
            "no-data value {nodata_value} lies inside the encoded range of scale {scale_factor}"
        )));
    }
    Ok(())
}

/// Encode the classification as `round(value * scale_factor)`, no-data pixels
/// as `nodata_value`. Valid values are limited to magnitudes strictly below the
/// marker's, so -1.0 at the default scale encodes as -9999.
pub fn to_fixed_point(grid: &ClassificationGrid, scale_factor: i32, nodata_value: i16) -> Result<Vec<i16>> {
    check_scale_factor(scale_factor, nodata_value)?;

    let scale = scale_factor as f64;
    let limit = scale_factor.min((nodata_value as i32).abs() - 1);
    Ok(grid
        .classes()
        .iter()
        .map(|class| match class {
            PixelClass::NoData => nodata_value,
            PixelClass::Valid(value) => {
                let encoded = (*value as f64 * scale).round() as i32;
                encoded.clamp(-limit, limit) as i16
            }
        })
        .collect())
}
