// SPDX-License-Identifier: GPL-3.0-only

//! Blur-vs-distance sweeps
//!
//! Samples the circle of confusion over a distance grid for one lens setting
//! or a family of settings, producing labeled series ready for export or
//! charting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CameraProfile;
use crate::constants::{grid, units};
use crate::errors::AppResult;
use crate::optics::{
    self, OpticsError, circle_of_confusion, circle_of_confusion_px, hyperfocal_distance,
    sensor_distance,
};

/// One contiguous piece of a distance grid, `[start_m, end_m)` in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSegment {
    pub start_m: f64,
    pub end_m: f64,
    pub step_m: f64,
}

/// Distance grid assembled from validated, ordered segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceGrid {
    segments: Vec<GridSegment>,
}

impl DistanceGrid {
    /// Build a grid from segments
    ///
    /// Each segment needs a positive start, a positive step and an end beyond
    /// its start; segments must not overlap their predecessor.
    pub fn new(segments: Vec<GridSegment>) -> Result<DistanceGrid, OpticsError> {
        let mut previous_end = 0.0;
        for segment in &segments {
            optics::require_positive("start_m", segment.start_m)?;
            optics::require_positive("step_m", segment.step_m)?;
            if !(segment.end_m > segment.start_m) {
                return Err(OpticsError::InvalidArgument {
                    name: "end_m",
                    value: segment.end_m,
                    constraint: "beyond the segment start",
                });
            }
            if segment.start_m < previous_end {
                return Err(OpticsError::InvalidArgument {
                    name: "start_m",
                    value: segment.start_m,
                    constraint: "at or beyond the previous segment end",
                });
            }
            previous_end = segment.end_m;
        }
        Ok(DistanceGrid { segments })
    }

    /// Dense near segment up to `dense_end_m`, coarse out to `far_end_m`
    pub fn dense_until(dense_end_m: f64, far_end_m: f64) -> Result<DistanceGrid, OpticsError> {
        DistanceGrid::new(vec![
            GridSegment {
                start_m: grid::NEAR_START_M,
                end_m: dense_end_m,
                step_m: grid::NEAR_STEP_M,
            },
            GridSegment {
                start_m: dense_end_m,
                end_m: far_end_m,
                step_m: grid::FAR_STEP_M,
            },
        ])
    }

    /// Sample the grid into strictly increasing distances
    ///
    /// Points are computed as `start + i * step` per segment so long segments
    /// do not accumulate rounding drift; segment ends are exclusive.
    pub fn sample(&self) -> Vec<f64> {
        let mut distances = Vec::new();
        for segment in &self.segments {
            let mut i = 0u32;
            loop {
                let d = segment.start_m + f64::from(i) * segment.step_m;
                if d >= segment.end_m {
                    break;
                }
                distances.push(d);
                i += 1;
            }
        }
        distances
    }
}

impl Default for DistanceGrid {
    /// The standard sweep grid: 0.15 m to 10 m every cm, then out to 100 m
    /// every 25 cm
    fn default() -> Self {
        DistanceGrid {
            segments: vec![
                GridSegment {
                    start_m: grid::NEAR_START_M,
                    end_m: grid::NEAR_END_M,
                    step_m: grid::NEAR_STEP_M,
                },
                GridSegment {
                    start_m: grid::NEAR_END_M,
                    end_m: grid::FAR_END_M,
                    step_m: grid::FAR_STEP_M,
                },
            ],
        }
    }
}

/// Unit of the blur axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlurUnit {
    /// Blur disk diameter in millimetres on the sensor
    Millimetres,
    /// Blur disk diameter in pixels
    #[default]
    Pixels,
}

impl BlurUnit {
    /// Get display name for the unit
    pub fn display_name(&self) -> &'static str {
        match self {
            BlurUnit::Millimetres => "mm",
            BlurUnit::Pixels => "pixels",
        }
    }

    /// Axis label for charts and CSV headers
    pub fn axis_label(&self) -> &'static str {
        match self {
            BlurUnit::Millimetres => "Blur [mm]",
            BlurUnit::Pixels => "Blur [px]",
        }
    }

    /// The other unit
    pub fn toggled(&self) -> BlurUnit {
        match self {
            BlurUnit::Millimetres => BlurUnit::Pixels,
            BlurUnit::Pixels => BlurUnit::Millimetres,
        }
    }
}

/// How a sweep chooses the focus distance for each lens setting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FocusPolicy {
    /// Focus each setting at its own hyperfocal distance
    #[default]
    Hyperfocal,
    /// Focus every setting at a fixed distance in metres
    Fixed(f64),
}

impl FocusPolicy {
    /// Focus distance in metres for one lens setting
    pub fn resolve(
        &self,
        focal_length_mm: f64,
        f_number: f64,
        coc_mm: f64,
    ) -> Result<f64, OpticsError> {
        match self {
            FocusPolicy::Hyperfocal => {
                let h = hyperfocal_distance(focal_length_mm, f_number, coc_mm)?;
                Ok(h / units::MM_PER_M)
            }
            FocusPolicy::Fixed(focus_m) => {
                optics::require_positive("focus_distance_m", *focus_m)?;
                Ok(*focus_m)
            }
        }
    }
}

/// One labeled blur-vs-distance curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSeries {
    /// Legend label, e.g. "f/5.6, 3mm"
    pub label: String,
    /// (distance in metres, blur in the requested unit)
    pub points: Vec<(f64, f64)>,
}

/// Which lens settings a sweep covers
#[derive(Debug, Clone, PartialEq)]
pub enum SweepRequest {
    /// The profile's own lens setting
    Single,
    /// One series per f-number, focal length from the profile
    FNumbers(Vec<f64>),
    /// One series per focal length, f-number from the profile
    FocalLengths(Vec<f64>),
    /// f-numbers and focal lengths advanced together
    Paired {
        f_numbers: Vec<f64>,
        focal_lengths: Vec<f64>,
    },
}

impl SweepRequest {
    /// Build the series for this request
    pub fn build(
        &self,
        profile: &CameraProfile,
        policy: FocusPolicy,
        unit: BlurUnit,
        grid: &DistanceGrid,
    ) -> AppResult<Vec<SweepSeries>> {
        match self {
            SweepRequest::Single => Ok(vec![blur_series(profile, policy, unit, grid)?]),
            SweepRequest::FNumbers(values) => {
                family_over_f_numbers(profile, values, policy, unit, grid)
            }
            SweepRequest::FocalLengths(values) => {
                family_over_focal_lengths(profile, values, policy, unit, grid)
            }
            SweepRequest::Paired {
                f_numbers,
                focal_lengths,
            } => family_paired(profile, f_numbers, focal_lengths, policy, unit, grid),
        }
    }

    /// Chart title for this request
    pub fn title(&self) -> &'static str {
        match self {
            SweepRequest::Single => "Circle of confusion",
            SweepRequest::FNumbers(_) => "Circle of confusion, [variable N]",
            SweepRequest::FocalLengths(_) => "Circle of confusion, [variable f]",
            SweepRequest::Paired { .. } => "Circle of confusion, [variable N, f]",
        }
    }
}

/// Blur series for the profile's own lens setting
pub fn blur_series(
    profile: &CameraProfile,
    policy: FocusPolicy,
    unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<SweepSeries> {
    let coc_mm = profile.acceptable_blur_mm()?;
    let focus_m = policy.resolve(profile.focal_length_mm, profile.f_number, coc_mm)?;
    let distances = grid.sample();
    Ok(series_for_lens(
        lens_label(profile.f_number, profile.focal_length_mm),
        profile.focal_length_mm,
        profile.f_number,
        profile.pixel_pitch_um,
        focus_m,
        unit,
        &distances,
    )?)
}

/// One series per f-number, focal length fixed to the profile's
pub fn family_over_f_numbers(
    profile: &CameraProfile,
    f_numbers: &[f64],
    policy: FocusPolicy,
    unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<Vec<SweepSeries>> {
    let coc_mm = profile.acceptable_blur_mm()?;
    let distances = grid.sample();
    f_numbers
        .iter()
        .map(|&f_number| {
            let focus_m = policy.resolve(profile.focal_length_mm, f_number, coc_mm)?;
            Ok(series_for_lens(
                lens_label(f_number, profile.focal_length_mm),
                profile.focal_length_mm,
                f_number,
                profile.pixel_pitch_um,
                focus_m,
                unit,
                &distances,
            )?)
        })
        .collect()
}

/// One series per focal length, f-number fixed to the profile's
pub fn family_over_focal_lengths(
    profile: &CameraProfile,
    focal_lengths: &[f64],
    policy: FocusPolicy,
    unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<Vec<SweepSeries>> {
    let coc_mm = profile.acceptable_blur_mm()?;
    let distances = grid.sample();
    focal_lengths
        .iter()
        .map(|&focal_length| {
            let focus_m = policy.resolve(focal_length, profile.f_number, coc_mm)?;
            Ok(series_for_lens(
                lens_label(profile.f_number, focal_length),
                focal_length,
                profile.f_number,
                profile.pixel_pitch_um,
                focus_m,
                unit,
                &distances,
            )?)
        })
        .collect()
}

/// One series per (f-number, focal length) pair, zipped to the shorter list
pub fn family_paired(
    profile: &CameraProfile,
    f_numbers: &[f64],
    focal_lengths: &[f64],
    policy: FocusPolicy,
    unit: BlurUnit,
    grid: &DistanceGrid,
) -> AppResult<Vec<SweepSeries>> {
    let coc_mm = profile.acceptable_blur_mm()?;
    let distances = grid.sample();
    f_numbers
        .iter()
        .zip(focal_lengths.iter())
        .map(|(&f_number, &focal_length)| {
            let focus_m = policy.resolve(focal_length, f_number, coc_mm)?;
            Ok(series_for_lens(
                lens_label(f_number, focal_length),
                focal_length,
                f_number,
                profile.pixel_pitch_um,
                focus_m,
                unit,
                &distances,
            )?)
        })
        .collect()
}

/// The acceptable-blur threshold in the requested unit
pub fn threshold_in_unit(profile: &CameraProfile, unit: BlurUnit) -> AppResult<f64> {
    match unit {
        BlurUnit::Pixels => Ok(profile.acceptable_blur_px),
        BlurUnit::Millimetres => profile.acceptable_blur_mm(),
    }
}

fn series_for_lens(
    label: String,
    focal_length_mm: f64,
    f_number: f64,
    pixel_pitch_um: f64,
    focus_m: f64,
    unit: BlurUnit,
    distances: &[f64],
) -> Result<SweepSeries, OpticsError> {
    let s_s = sensor_distance(focus_m, focal_length_mm)?;
    let mut points = Vec::with_capacity(distances.len());
    for &distance_m in distances {
        let blur = match unit {
            BlurUnit::Pixels => {
                circle_of_confusion_px(distance_m, f_number, focal_length_mm, s_s, pixel_pitch_um)?
            }
            BlurUnit::Millimetres => {
                circle_of_confusion(distance_m, f_number, focal_length_mm, s_s)?
            }
        };
        points.push((distance_m, blur));
    }
    debug!(label = %label, points = points.len(), "sampled blur series");
    Ok(SweepSeries { label, points })
}

fn lens_label(f_number: f64, focal_length_mm: f64) -> String {
    format!("f/{:.1}, {}", f_number, format_focal(focal_length_mm))
}

fn format_focal(focal_length_mm: f64) -> String {
    if focal_length_mm == focal_length_mm.floor() {
        format!("{}mm", focal_length_mm as u32)
    } else {
        format!("{:.1}mm", focal_length_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn docking() -> CameraProfile {
        config::find_builtin("docking").unwrap()
    }

    #[test]
    fn test_default_grid_is_strictly_increasing() {
        let distances = DistanceGrid::default().sample();
        assert!(!distances.is_empty());
        assert!((distances[0] - 0.15).abs() < 1e-12);
        assert!(*distances.last().unwrap() < 100.0);
        for pair in distances.windows(2) {
            assert!(pair[1] > pair[0], "{} then {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_grid_rejects_bad_segments() {
        let zero_step = DistanceGrid::new(vec![GridSegment {
            start_m: 1.0,
            end_m: 2.0,
            step_m: 0.0,
        }]);
        assert!(zero_step.is_err());

        let backwards = DistanceGrid::new(vec![GridSegment {
            start_m: 2.0,
            end_m: 1.0,
            step_m: 0.1,
        }]);
        assert!(backwards.is_err());

        let overlapping = DistanceGrid::new(vec![
            GridSegment {
                start_m: 1.0,
                end_m: 5.0,
                step_m: 0.1,
            },
            GridSegment {
                start_m: 4.0,
                end_m: 10.0,
                step_m: 0.5,
            },
        ]);
        assert!(overlapping.is_err());
    }

    #[test]
    fn test_dense_until_boundaries() {
        let distances = DistanceGrid::dense_until(20.0, 100.0).unwrap().sample();
        assert!(distances.contains(&20.0));
        assert!((distances.last().unwrap() - 99.75).abs() < 1e-9);
    }

    #[test]
    fn test_family_over_f_numbers_labels_and_shape() {
        let f_numbers = [1.0, 1.2, 1.4, 1.8, 2.0, 2.2, 2.8, 4.0, 5.6];
        let grid = DistanceGrid::dense_until(1.0, 2.0).unwrap();
        let family = family_over_f_numbers(
            &docking(),
            &f_numbers,
            FocusPolicy::Hyperfocal,
            BlurUnit::Pixels,
            &grid,
        )
        .unwrap();

        assert_eq!(family.len(), f_numbers.len());
        assert_eq!(family[0].label, "f/1.0, 3mm");
        assert_eq!(family[8].label, "f/5.6, 3mm");
        let expected_points = grid.sample().len();
        for series in &family {
            assert_eq!(series.points.len(), expected_points);
        }
    }

    #[test]
    fn test_hyperfocal_focus_keeps_grid_within_threshold() {
        let profile = docking();
        let series = blur_series(
            &profile,
            FocusPolicy::Hyperfocal,
            BlurUnit::Pixels,
            &DistanceGrid::default(),
        )
        .unwrap();

        // Focused at hyperfocal the acceptable blur holds from H/2 outward,
        // which is closer than the default grid start for this lens.
        for &(distance_m, blur_px) in &series.points {
            assert!(
                blur_px <= profile.acceptable_blur_px + 1e-9,
                "{} px at {} m",
                blur_px,
                distance_m
            );
        }
    }

    #[test]
    fn test_fixed_focus_blurs_outside_dof() {
        let profile = config::find_builtin("inspection").unwrap();
        let grid = DistanceGrid::default();
        let series = blur_series(
            &profile,
            FocusPolicy::Fixed(5.0),
            BlurUnit::Pixels,
            &grid,
        )
        .unwrap();

        let threshold = profile.acceptable_blur_px;
        let near_point = series.points.iter().find(|p| p.0 < 0.2).unwrap();
        let at_focus = series
            .points
            .iter()
            .min_by(|a, b| (a.0 - 5.0).abs().total_cmp(&(b.0 - 5.0).abs()))
            .unwrap();
        let far_point = series.points.last().unwrap();

        assert!(near_point.1 > threshold);
        assert!(at_focus.1 < threshold);
        assert!(far_point.1 > threshold);
    }

    #[test]
    fn test_threshold_units() {
        let profile = docking();
        let px = threshold_in_unit(&profile, BlurUnit::Pixels).unwrap();
        let mm = threshold_in_unit(&profile, BlurUnit::Millimetres).unwrap();
        assert_eq!(px, 4.0);
        assert!((mm - 0.0088).abs() < 1e-12);
    }

    #[test]
    fn test_request_dispatch_and_titles() {
        let grid = DistanceGrid::dense_until(1.0, 2.0).unwrap();
        let single = SweepRequest::Single
            .build(
                &docking(),
                FocusPolicy::Hyperfocal,
                BlurUnit::Pixels,
                &grid,
            )
            .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].label, "f/5.6, 3mm");

        let request = SweepRequest::FocalLengths(vec![8.0, 12.0, 16.0]);
        let family = request
            .build(
                &docking(),
                FocusPolicy::Fixed(0.3),
                BlurUnit::Millimetres,
                &grid,
            )
            .unwrap();
        assert_eq!(family.len(), 3);
        assert_eq!(family[2].label, "f/5.6, 16mm");

        assert_eq!(SweepRequest::Single.title(), "Circle of confusion");
        assert_eq!(request.title(), "Circle of confusion, [variable f]");
    }

    #[test]
    fn test_paired_family_stops_at_shorter_list() {
        let family = family_paired(
            &docking(),
            &[1.0, 2.0, 2.8],
            &[8.0, 12.0],
            FocusPolicy::Hyperfocal,
            BlurUnit::Pixels,
            &DistanceGrid::dense_until(1.0, 2.0).unwrap(),
        )
        .unwrap();
        assert_eq!(family.len(), 2);
        assert_eq!(family[0].label, "f/1.0, 8mm");
        assert_eq!(family[1].label, "f/2.0, 12mm");
    }
}
