// SPDX-License-Identifier: GPL-3.0-only

//! Field-of-view and target coverage formulas
//!
//! How large a feature appears on the sensor and over which distance band a
//! detector can work with it. All of these treat a single optical axis: the
//! field of view and the pixel count describe the same axis.

use super::{OpticsError, require_fov_deg, require_non_negative, require_pixels, require_positive};

/// Apparent feature size in pixels at a target distance
///
/// The instantaneous field of view of one pixel is `FoV / res` (radians);
/// the feature spans `feature / (d * tan(iFoV))` pixels, rounded up so a
/// partially covered pixel still counts.
pub fn target_size_px(
    target_distance_m: f64,
    fov_deg: f64,
    resolution_px: u32,
    feature_size_m: f64,
) -> Result<u32, OpticsError> {
    require_positive("target_distance_m", target_distance_m)?;
    require_fov_deg("fov_deg", fov_deg)?;
    require_pixels("resolution_px", resolution_px)?;
    require_non_negative("feature_size_m", feature_size_m)?;

    let ifov = fov_deg.to_radians() / resolution_px as f64;
    let px = feature_size_m / (target_distance_m * ifov.tan());
    Ok(px.ceil() as u32)
}

/// Closest distance at which the feature still fits the field of view
pub fn min_target_distance(fov_deg: f64, feature_size_m: f64) -> Result<f64, OpticsError> {
    require_fov_deg("fov_deg", fov_deg)?;
    require_non_negative("feature_size_m", feature_size_m)?;

    Ok((feature_size_m / 2.0) / (fov_deg.to_radians() / 2.0).tan())
}

/// Closest distance at which the feature fills at most `coverage` of the frame
///
/// `coverage` is a fraction of the field of view in `(0, 1]`; 1 reproduces
/// [`min_target_distance`].
pub fn min_target_distance_with_coverage(
    fov_deg: f64,
    feature_size_m: f64,
    coverage: f64,
) -> Result<f64, OpticsError> {
    if !(coverage > 0.0 && coverage <= 1.0) {
        return Err(OpticsError::InvalidArgument {
            name: "coverage",
            value: coverage,
            constraint: "a fraction in (0, 1]",
        });
    }
    min_target_distance(fov_deg, feature_size_m / coverage)
}

/// Smallest field of view that still frames the feature at a distance
///
/// Inverse of [`min_target_distance`]: `2 * atan(feature / (2 * d))`,
/// returned in degrees.
pub fn min_field_of_view(target_distance_m: f64, feature_size_m: f64) -> Result<f64, OpticsError> {
    require_positive("target_distance_m", target_distance_m)?;
    require_non_negative("feature_size_m", feature_size_m)?;

    Ok((feature_size_m / (2.0 * target_distance_m)).atan().to_degrees() * 2.0)
}

/// Farthest distance at which the feature still spans the minimum pixel count
pub fn max_target_distance(
    fov_deg: f64,
    resolution_px: u32,
    min_feature_px: u32,
    feature_size_m: f64,
) -> Result<f64, OpticsError> {
    require_fov_deg("fov_deg", fov_deg)?;
    require_pixels("resolution_px", resolution_px)?;
    require_pixels("min_feature_px", min_feature_px)?;
    require_non_negative("feature_size_m", feature_size_m)?;

    let ifov = fov_deg.to_radians() / resolution_px as f64;
    Ok(feature_size_m / (ifov.tan() * min_feature_px as f64))
}
