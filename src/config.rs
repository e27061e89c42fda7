// SPDX-License-Identifier: GPL-3.0-only

//! Camera profiles and detection requirements

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::defaults;
use crate::errors::{AppError, AppResult, OpticsError};
use crate::optics;

/// Optical description of one camera, along its reference axis
///
/// The field of view and the pixel count describe the same axis; for the
/// depth-of-field numbers only the lens parameters matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    /// Short name used to select the profile
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Field of view in degrees
    pub fov_deg: f64,
    /// Sensor resolution in pixels
    pub resolution_px: u32,
    /// Focal length in millimetres
    pub focal_length_mm: f64,
    /// Aperture f-number
    pub f_number: f64,
    /// Pixel pitch in micrometres
    #[serde(default = "default_pixel_pitch")]
    pub pixel_pitch_um: f64,
    /// Acceptable blur disk diameter in pixels
    #[serde(default = "default_acceptable_blur")]
    pub acceptable_blur_px: f64,
}

fn default_pixel_pitch() -> f64 {
    defaults::PIXEL_PITCH_UM
}

fn default_acceptable_blur() -> f64 {
    defaults::ACCEPTABLE_BLUR_PX
}

impl CameraProfile {
    /// Check every parameter against its physical constraint
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Config("profile name must not be empty".into()));
        }
        optics::require_fov_deg("fov_deg", self.fov_deg)?;
        optics::require_pixels("resolution_px", self.resolution_px)?;
        optics::require_positive("focal_length_mm", self.focal_length_mm)?;
        optics::require_positive("f_number", self.f_number)?;
        optics::require_positive("pixel_pitch_um", self.pixel_pitch_um)?;
        optics::require_positive("acceptable_blur_px", self.acceptable_blur_px)?;
        Ok(())
    }

    /// Acceptable blur threshold converted to millimetres
    pub fn acceptable_blur_mm(&self) -> AppResult<f64> {
        Ok(optics::blur_threshold_mm(
            self.acceptable_blur_px,
            self.pixel_pitch_um,
        )?)
    }

    /// Hyperfocal distance in millimetres at the profile's acceptable blur
    pub fn hyperfocal_mm(&self) -> AppResult<f64> {
        let coc_mm = self.acceptable_blur_mm()?;
        Ok(optics::hyperfocal_distance(
            self.focal_length_mm,
            self.f_number,
            coc_mm,
        )?)
    }

    /// Load a profile from a JSON file
    pub fn load(path: &Path) -> AppResult<CameraProfile> {
        let contents = fs::read_to_string(path)?;
        let profile: CameraProfile = serde_json::from_str(&contents)?;
        profile.validate()?;
        debug!(profile = %profile.name, path = %path.display(), "loaded camera profile");
        Ok(profile)
    }
}

/// Built-in example profiles
pub fn builtins() -> Vec<CameraProfile> {
    vec![
        CameraProfile {
            name: "docking".into(),
            description: "Wide-angle navigation camera for final approach".into(),
            fov_deg: 61.93,
            resolution_px: 1944,
            focal_length_mm: 3.0,
            f_number: 5.6,
            pixel_pitch_um: defaults::PIXEL_PITCH_UM,
            acceptable_blur_px: defaults::ACCEPTABLE_BLUR_PX,
        },
        CameraProfile {
            name: "rendezvous".into(),
            description: "Mid-range tracking camera".into(),
            fov_deg: 31.0,
            resolution_px: 1944,
            focal_length_mm: 12.0,
            f_number: 4.0,
            pixel_pitch_um: defaults::PIXEL_PITCH_UM,
            acceptable_blur_px: defaults::ACCEPTABLE_BLUR_PX,
        },
        CameraProfile {
            name: "inspection".into(),
            description: "Narrow-field close-inspection camera".into(),
            fov_deg: 17.0,
            resolution_px: 1944,
            focal_length_mm: 16.0,
            f_number: 2.0,
            pixel_pitch_um: defaults::PIXEL_PITCH_UM,
            acceptable_blur_px: defaults::ACCEPTABLE_BLUR_PX,
        },
    ]
}

/// Look up a built-in profile by name (case-insensitive)
pub fn find_builtin(name: &str) -> Option<CameraProfile> {
    builtins()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// What the detector needs from the image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionSpec {
    /// Size of the feature to resolve, in metres
    pub feature_size_m: f64,
    /// Minimum pixels the feature must span
    pub min_feature_px: u32,
    /// Fraction of the frame the feature may fill at closest approach
    pub coverage: f64,
    /// Reference distance for single-distance numbers, in metres
    pub reference_distance_m: f64,
}

impl Default for DetectionSpec {
    fn default() -> Self {
        Self {
            feature_size_m: defaults::FEATURE_SIZE_M,
            min_feature_px: defaults::MIN_FEATURE_PX,
            coverage: defaults::COVERAGE,
            reference_distance_m: defaults::REFERENCE_DISTANCE_M,
        }
    }
}

impl DetectionSpec {
    /// Check every parameter against its physical constraint
    pub fn validate(&self) -> AppResult<()> {
        optics::require_non_negative("feature_size_m", self.feature_size_m)?;
        optics::require_pixels("min_feature_px", self.min_feature_px)?;
        if !(self.coverage > 0.0 && self.coverage <= 1.0) {
            return Err(OpticsError::InvalidArgument {
                name: "coverage",
                value: self.coverage,
                constraint: "a fraction in (0, 1]",
            }
            .into());
        }
        optics::require_positive("reference_distance_m", self.reference_distance_m)?;
        Ok(())
    }
}
