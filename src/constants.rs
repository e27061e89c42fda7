// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Unit conversion factors
///
/// The formulas mix units on purpose: focal lengths and blur disks live in
/// millimetres, target distances in metres, pixel pitch in micrometres.
/// Conversions are explicit multiplications at the call site.
pub mod units {
    /// Millimetres per metre
    pub const MM_PER_M: f64 = 1000.0;

    /// Micrometres per millimetre
    pub const UM_PER_MM: f64 = 1000.0;

    /// Centimetres per metre
    pub const CM_PER_M: f64 = 100.0;
}

/// Default optical parameters
pub mod defaults {
    /// Pixel pitch of the reference sensor in micrometres
    pub const PIXEL_PITCH_UM: f64 = 2.2;

    /// Acceptable blur disk diameter in pixels
    pub const ACCEPTABLE_BLUR_PX: f64 = 4.0;

    /// Feature size the detector must resolve, in metres
    pub const FEATURE_SIZE_M: f64 = 0.1;

    /// Minimum number of pixels the feature must span
    pub const MIN_FEATURE_PX: u32 = 10;

    /// Fraction of the frame the feature may fill at closest approach
    pub const COVERAGE: f64 = 0.9;

    /// Reference distance for single-distance reports, in metres
    pub const REFERENCE_DISTANCE_M: f64 = 1.0;
}

/// Default distance grid for blur sweeps
///
/// Dense sampling close to the camera where the blur changes quickly, coarse
/// sampling out to the far end.
pub mod grid {
    /// Near segment start in metres
    pub const NEAR_START_M: f64 = 0.15;

    /// Near segment end in metres
    pub const NEAR_END_M: f64 = 10.0;

    /// Near segment step in metres
    pub const NEAR_STEP_M: f64 = 0.01;

    /// Far segment end in metres
    pub const FAR_END_M: f64 = 100.0;

    /// Far segment step in metres
    pub const FAR_STEP_M: f64 = 0.25;
}

/// Chart rendering constants
pub mod chart {
    /// Upper bound of the blur axis in pixels
    ///
    /// The blur disk grows without bound as the target approaches the lens,
    /// so the axis is capped to keep the in-focus region readable.
    pub const BLUR_AXIS_MAX_PX: f64 = 15.0;
}

/// Format a distance in metres for display (e.g., "1.86 m" or "48.3 cm")
pub fn format_distance_m(meters: f64) -> String {
    if meters >= 1.0 {
        format!("{:.2} m", meters)
    } else if meters >= 0.01 {
        format!("{:.1} cm", meters * units::CM_PER_M)
    } else {
        format!("{:.2} mm", meters * units::MM_PER_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance_m(12.5), "12.50 m");
        assert_eq!(format_distance_m(0.483), "48.3 cm");
        assert_eq!(format_distance_m(0.0042), "4.20 mm");
    }

    #[test]
    fn test_unit_factors() {
        assert_eq!(units::MM_PER_M, units::UM_PER_MM * 1.0);
        assert_eq!(units::CM_PER_M * 10.0, units::MM_PER_M);
    }
}
