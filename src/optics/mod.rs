// SPDX-License-Identifier: GPL-3.0-only

//! Thin-lens optics formulas
//!
//! Pure functions over scalar inputs. Focal lengths, sensor distances and
//! blur disks are in millimetres, target distances in metres, pixel pitch in
//! micrometres, fields of view in degrees. Every function validates its
//! physical preconditions and returns [`OpticsError::InvalidArgument`] for
//! the first violated one; within the validated domain no division can hit a
//! zero denominator.

mod blur;
mod coverage;
mod dof;

pub use blur::{blur_threshold_mm, circle_of_confusion, circle_of_confusion_px};
pub use coverage::{
    max_target_distance, min_field_of_view, min_target_distance,
    min_target_distance_with_coverage, target_size_px,
};
pub use dof::{
    DofBound, DofRange, depth_of_field, far_distance, focus_distance, hyperfocal_distance,
    near_distance, sensor_distance,
};

pub use crate::errors::OpticsError;

/// Reject values that are not finite and strictly positive (NaN included)
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), OpticsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OpticsError::InvalidArgument {
            name,
            value,
            constraint: "finite and greater than zero",
        })
    }
}

/// Reject values that are not finite and non-negative
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<(), OpticsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OpticsError::InvalidArgument {
            name,
            value,
            constraint: "finite and non-negative",
        })
    }
}

/// Reject fields of view outside the open interval (0, 180) degrees
pub(crate) fn require_fov_deg(name: &'static str, value: f64) -> Result<(), OpticsError> {
    if value > 0.0 && value < 180.0 {
        Ok(())
    } else {
        Err(OpticsError::InvalidArgument {
            name,
            value,
            constraint: "between 0 and 180 degrees exclusive",
        })
    }
}

/// Reject zero pixel counts
pub(crate) fn require_pixels(name: &'static str, value: u32) -> Result<(), OpticsError> {
    if value > 0 {
        Ok(())
    } else {
        Err(OpticsError::InvalidArgument {
            name,
            value: value as f64,
            constraint: "at least one pixel",
        })
    }
}
