// SPDX-License-Identifier: GPL-3.0-only

//! Depth of field and focus distance formulas

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::units;

use super::{OpticsError, require_positive};

/// One edge of the depth of field
///
/// The far edge reaches optical infinity once the focus distance meets the
/// hyperfocal distance; that case is a legitimate result, not an error, and
/// is carried explicitly instead of as a large sentinel number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DofBound {
    /// Edge at a finite distance in millimetres
    Finite(f64),
    /// Edge at optical infinity
    Infinite,
}

impl DofBound {
    /// Get the finite distance in millimetres, if there is one
    pub fn finite_mm(self) -> Option<f64> {
        match self {
            DofBound::Finite(mm) => Some(mm),
            DofBound::Infinite => None,
        }
    }

    /// Check whether the edge is at infinity
    pub fn is_infinite(self) -> bool {
        matches!(self, DofBound::Infinite)
    }
}

impl fmt::Display for DofBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DofBound::Finite(mm) => write!(f, "{:.2} mm", mm),
            DofBound::Infinite => write!(f, "infinity"),
        }
    }
}

/// Depth of field around a focus distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DofRange {
    /// Near edge in millimetres (always finite for a valid focus setting)
    pub near_mm: f64,
    /// Far edge
    pub far: DofBound,
}

impl DofRange {
    /// Total in-focus span
    pub fn span_mm(&self) -> DofBound {
        match self.far {
            DofBound::Finite(far_mm) => DofBound::Finite(far_mm - self.near_mm),
            DofBound::Infinite => DofBound::Infinite,
        }
    }
}

/// Hyperfocal distance in millimetres
///
/// ```text
/// H = f^2 / (N * c) + f
/// ```
///
/// Focusing the lens at `H` puts everything from `H/2` out to infinity
/// within the acceptable blur `c`. The result is always strictly greater
/// than the focal length.
pub fn hyperfocal_distance(
    focal_length_mm: f64,
    f_number: f64,
    coc_mm: f64,
) -> Result<f64, OpticsError> {
    require_positive("focal_length_mm", focal_length_mm)?;
    require_positive("f_number", f_number)?;
    require_positive("coc_mm", coc_mm)?;

    Ok(focal_length_mm * focal_length_mm / (f_number * coc_mm) + focal_length_mm)
}

/// Near edge of the depth of field in millimetres
///
/// `focus * (H - f) / (H + focus - 2f)`. With the focus distance and the
/// hyperfocal distance both beyond the focal length the denominator is
/// strictly positive, so the near edge is always finite.
pub fn near_distance(
    focal_length_mm: f64,
    focus_distance_mm: f64,
    hyperfocal_mm: f64,
) -> Result<f64, OpticsError> {
    require_positive("focal_length_mm", focal_length_mm)?;
    require_beyond_focal("focus_distance_mm", focus_distance_mm, focal_length_mm)?;
    require_beyond_focal("hyperfocal_mm", hyperfocal_mm, focal_length_mm)?;

    let h = hyperfocal_mm;
    let s = focus_distance_mm;
    let f = focal_length_mm;
    Ok(s * (h - f) / (h + s - 2.0 * f))
}

/// Far edge of the depth of field
///
/// `focus * (H - f) / (H - focus)` while the focus distance is short of the
/// hyperfocal distance; [`DofBound::Infinite`] once it reaches it.
pub fn far_distance(
    focal_length_mm: f64,
    focus_distance_mm: f64,
    hyperfocal_mm: f64,
) -> Result<DofBound, OpticsError> {
    require_positive("focal_length_mm", focal_length_mm)?;
    require_beyond_focal("focus_distance_mm", focus_distance_mm, focal_length_mm)?;
    require_beyond_focal("hyperfocal_mm", hyperfocal_mm, focal_length_mm)?;

    let h = hyperfocal_mm;
    let s = focus_distance_mm;
    let f = focal_length_mm;
    if s >= h {
        return Ok(DofBound::Infinite);
    }
    Ok(DofBound::Finite(s * (h - f) / (h - s)))
}

/// Both depth-of-field edges for one focus setting
pub fn depth_of_field(
    focal_length_mm: f64,
    focus_distance_mm: f64,
    hyperfocal_mm: f64,
) -> Result<DofRange, OpticsError> {
    let near_mm = near_distance(focal_length_mm, focus_distance_mm, hyperfocal_mm)?;
    let far = far_distance(focal_length_mm, focus_distance_mm, hyperfocal_mm)?;
    Ok(DofRange { near_mm, far })
}

/// Lens-to-sensor distance in millimetres for a focus distance in metres
///
/// The thin-lens conjugate `s_s = f * d / (d - f)`. The focus distance must
/// lie beyond the focal length or no real image forms.
pub fn sensor_distance(focus_distance_m: f64, focal_length_mm: f64) -> Result<f64, OpticsError> {
    require_positive("focal_length_mm", focal_length_mm)?;
    require_positive("focus_distance_m", focus_distance_m)?;

    let d = focus_distance_m * units::MM_PER_M;
    if d <= focal_length_mm {
        return Err(OpticsError::InvalidArgument {
            name: "focus_distance_m",
            value: focus_distance_m,
            constraint: "greater than the focal length",
        });
    }
    Ok(focal_length_mm * d / (d - focal_length_mm))
}

/// Focus distance in metres for a lens-to-sensor distance in millimetres
///
/// Inverse of [`sensor_distance`]; requires `s_s` beyond the focal length.
pub fn focus_distance(sensor_distance_mm: f64, focal_length_mm: f64) -> Result<f64, OpticsError> {
    require_positive("focal_length_mm", focal_length_mm)?;
    require_beyond_focal("sensor_distance_mm", sensor_distance_mm, focal_length_mm)?;

    let d = sensor_distance_mm * focal_length_mm / (sensor_distance_mm - focal_length_mm);
    Ok(d / units::MM_PER_M)
}

fn require_beyond_focal(
    name: &'static str,
    value_mm: f64,
    focal_length_mm: f64,
) -> Result<(), OpticsError> {
    require_positive(name, value_mm)?;
    if value_mm > focal_length_mm {
        Ok(())
    } else {
        Err(OpticsError::InvalidArgument {
            name,
            value: value_mm,
            constraint: "greater than the focal length",
        })
    }
}
