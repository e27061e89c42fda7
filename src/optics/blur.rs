// SPDX-License-Identifier: GPL-3.0-only

//! Circle-of-confusion formulas
//!
//! The blur disk a point target projects onto the sensor when the lens is
//! focused somewhere else. Derived from the thin-lens equation with the
//! aperture diameter f/N.

use crate::constants::units;

use super::{OpticsError, require_positive};

/// Blur disk diameter in millimetres for a target at `target_distance_m`
///
/// With the lens-to-sensor distance `s_s` fixed (i.e. focus locked), a point
/// at target distance `s_t` images to a disk of diameter
///
/// ```text
/// c = (1/N) * |f - s_s * (s_t - f) / s_t|
/// ```
///
/// where all lengths on the right are in millimetres. The result is zero
/// exactly when `s_s` is the conjugate of `s_t`, and grows in both
/// directions away from the focus distance.
pub fn circle_of_confusion(
    target_distance_m: f64,
    f_number: f64,
    focal_length_mm: f64,
    sensor_distance_mm: f64,
) -> Result<f64, OpticsError> {
    require_positive("target_distance_m", target_distance_m)?;
    require_positive("f_number", f_number)?;
    require_positive("focal_length_mm", focal_length_mm)?;
    require_positive("sensor_distance_mm", sensor_distance_mm)?;

    let s_t = target_distance_m * units::MM_PER_M;
    let coc = (focal_length_mm - sensor_distance_mm * (s_t - focal_length_mm) / s_t).abs();
    Ok(coc / f_number)
}

/// Blur disk diameter in pixels
///
/// The millimetre result of [`circle_of_confusion`] divided by the pixel
/// pitch converted to millimetres, so the two forms agree exactly.
pub fn circle_of_confusion_px(
    target_distance_m: f64,
    f_number: f64,
    focal_length_mm: f64,
    sensor_distance_mm: f64,
    pixel_pitch_um: f64,
) -> Result<f64, OpticsError> {
    require_positive("pixel_pitch_um", pixel_pitch_um)?;

    let coc_mm = circle_of_confusion(
        target_distance_m,
        f_number,
        focal_length_mm,
        sensor_distance_mm,
    )?;
    Ok(coc_mm / (pixel_pitch_um / units::UM_PER_MM))
}

/// Convert an acceptable-blur threshold from pixels to millimetres
pub fn blur_threshold_mm(threshold_px: f64, pixel_pitch_um: f64) -> Result<f64, OpticsError> {
    require_positive("threshold_px", threshold_px)?;
    require_positive("pixel_pitch_um", pixel_pitch_um)?;

    Ok(threshold_px * (pixel_pitch_um / units::UM_PER_MM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::sensor_distance;

    #[test]
    fn test_blur_vanishes_at_focus_distance() {
        let s_s = sensor_distance(5.0, 3.0).unwrap();
        let coc = circle_of_confusion(5.0, 5.6, 3.0, s_s).unwrap();
        assert!(coc.abs() < 1e-12, "focused target blur was {}", coc);
    }

    #[test]
    fn test_blur_grows_away_from_focus() {
        let s_s = sensor_distance(5.0, 3.0).unwrap();
        let at_focus = circle_of_confusion(5.0, 5.6, 3.0, s_s).unwrap();
        let nearer = circle_of_confusion(1.0, 5.6, 3.0, s_s).unwrap();
        let farther = circle_of_confusion(60.0, 5.6, 3.0, s_s).unwrap();
        assert!(nearer > at_focus);
        assert!(farther > at_focus);
    }

    #[test]
    fn test_blur_shrinks_with_larger_f_number() {
        let s_s = sensor_distance(5.0, 3.0).unwrap();
        let wide_open = circle_of_confusion(1.0, 1.4, 3.0, s_s).unwrap();
        let stopped_down = circle_of_confusion(1.0, 5.6, 3.0, s_s).unwrap();
        assert!(stopped_down < wide_open);
        assert!((wide_open / stopped_down - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_px_and_mm_forms_agree_exactly() {
        let s_s = sensor_distance(5.0, 3.0).unwrap();
        let mm = circle_of_confusion(1.0, 5.6, 3.0, s_s).unwrap();
        let px = circle_of_confusion_px(1.0, 5.6, 3.0, s_s, 2.2).unwrap();
        assert_eq!(px, mm / (2.2 / 1000.0));
    }

    #[test]
    fn test_threshold_conversion() {
        let mm = blur_threshold_mm(4.0, 2.2).unwrap();
        assert!((mm - 0.0088).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        let err = circle_of_confusion(0.0, 5.6, 3.0, 3.01).unwrap_err();
        assert!(matches!(
            err,
            OpticsError::InvalidArgument {
                name: "target_distance_m",
                ..
            }
        ));

        let err = circle_of_confusion(1.0, -2.0, 3.0, 3.01).unwrap_err();
        assert!(matches!(
            err,
            OpticsError::InvalidArgument {
                name: "f_number",
                ..
            }
        ));

        let err = circle_of_confusion_px(1.0, 5.6, 3.0, 3.01, f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            OpticsError::InvalidArgument {
                name: "pixel_pitch_um",
                ..
            }
        ));
    }
}
