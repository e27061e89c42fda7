// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for lens sizing
//!
//! This module provides command-line functionality for:
//! - Printing a lens report for one camera profile
//! - Exporting blur-vs-distance sweeps as CSV or JSON
//! - Charting sweeps in the terminal
//! - Evaluating candidate fields of view
//! - Listing built-in profiles

use chrono::Local;
use focal::config::{self, CameraProfile, DetectionSpec};
use focal::constants::{defaults, format_distance_m, grid, units};
use focal::errors::{AppError, AppResult};
use focal::optics;
use focal::sweep::{BlurUnit, DistanceGrid, FocusPolicy, SweepRequest, SweepSeries};
use focal::terminal;
use serde::Serialize;
use std::path::PathBuf;

/// Profile selection shared by every command
#[derive(Debug, clap::Args)]
pub struct ProfileArgs {
    /// Built-in profile name (see `focal profiles`)
    #[arg(short, long, default_value = "docking")]
    pub profile: String,

    /// JSON profile file, used instead of --profile
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the focal length in millimetres
    #[arg(long, value_name = "MM")]
    pub focal_length: Option<f64>,

    /// Override the f-number
    #[arg(long, value_name = "N")]
    pub f_number: Option<f64>,

    /// Override the field of view in degrees
    #[arg(long, value_name = "DEG")]
    pub fov: Option<f64>,

    /// Override the sensor resolution in pixels
    #[arg(long, value_name = "PX")]
    pub resolution: Option<u32>,

    /// Override the pixel pitch in micrometres
    #[arg(long, value_name = "UM")]
    pub pixel_pitch: Option<f64>,

    /// Override the acceptable blur in pixels
    #[arg(long, value_name = "PX")]
    pub blur_px: Option<f64>,
}

impl ProfileArgs {
    /// Resolve to a validated profile: file or built-in, then overrides
    pub fn resolve(&self) -> AppResult<CameraProfile> {
        let mut profile = if let Some(path) = &self.config {
            CameraProfile::load(path)?
        } else {
            config::find_builtin(&self.profile).ok_or_else(|| {
                AppError::Config(format!(
                    "unknown profile '{}', run `focal profiles` to list built-ins",
                    self.profile
                ))
            })?
        };

        if let Some(value) = self.focal_length {
            profile.focal_length_mm = value;
        }
        if let Some(value) = self.f_number {
            profile.f_number = value;
        }
        if let Some(value) = self.fov {
            profile.fov_deg = value;
        }
        if let Some(value) = self.resolution {
            profile.resolution_px = value;
        }
        if let Some(value) = self.pixel_pitch {
            profile.pixel_pitch_um = value;
        }
        if let Some(value) = self.blur_px {
            profile.acceptable_blur_px = value;
        }

        profile.validate()?;
        Ok(profile)
    }
}

/// Detection requirement shared by report and coverage
#[derive(Debug, clap::Args)]
pub struct DetectionArgs {
    /// Feature size to resolve, in metres
    #[arg(long, value_name = "M", default_value_t = defaults::FEATURE_SIZE_M)]
    pub feature_size: f64,

    /// Minimum pixels the feature must span for detection
    #[arg(long, value_name = "PX", default_value_t = defaults::MIN_FEATURE_PX)]
    pub min_pixels: u32,

    /// Frame fraction the feature may fill at closest approach
    #[arg(long, default_value_t = defaults::COVERAGE)]
    pub coverage: f64,

    /// Reference distance for single-distance numbers, in metres
    #[arg(long, value_name = "M", default_value_t = defaults::REFERENCE_DISTANCE_M)]
    pub distance: f64,
}

impl DetectionArgs {
    /// Resolve to a validated detection spec
    pub fn resolve(&self) -> AppResult<DetectionSpec> {
        let spec = DetectionSpec {
            feature_size_m: self.feature_size,
            min_feature_px: self.min_pixels,
            coverage: self.coverage,
            reference_distance_m: self.distance,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Sweep shape shared by the sweep and chart commands
#[derive(Debug, clap::Args)]
pub struct SweepArgs {
    /// Sweep these f-numbers, focal length fixed to the profile's
    #[arg(long, value_name = "N", value_delimiter = ',', num_args = 1..)]
    pub f_numbers: Option<Vec<f64>>,

    /// Sweep these focal lengths in mm, f-number fixed to the profile's
    ///
    /// Together with --f-numbers the two lists advance in lockstep.
    #[arg(long, value_name = "MM", value_delimiter = ',', num_args = 1..)]
    pub focal_lengths: Option<Vec<f64>>,

    /// Focus every setting at this distance in metres instead of its
    /// hyperfocal distance
    #[arg(long, value_name = "M")]
    pub focus: Option<f64>,

    /// Report blur in millimetres instead of pixels
    #[arg(long)]
    pub mm: bool,

    /// End of the dense centimetre-step grid segment, in metres
    #[arg(long, value_name = "M", default_value_t = grid::NEAR_END_M)]
    pub dense_until: f64,

    /// Far end of the distance grid, in metres
    #[arg(long, value_name = "M", default_value_t = grid::FAR_END_M)]
    pub max_distance: f64,
}

impl SweepArgs {
    pub fn request(&self) -> SweepRequest {
        match (&self.f_numbers, &self.focal_lengths) {
            (Some(f_numbers), Some(focal_lengths)) => SweepRequest::Paired {
                f_numbers: f_numbers.clone(),
                focal_lengths: focal_lengths.clone(),
            },
            (Some(f_numbers), None) => SweepRequest::FNumbers(f_numbers.clone()),
            (None, Some(focal_lengths)) => SweepRequest::FocalLengths(focal_lengths.clone()),
            (None, None) => SweepRequest::Single,
        }
    }

    pub fn policy(&self) -> FocusPolicy {
        match self.focus {
            Some(focus_m) => FocusPolicy::Fixed(focus_m),
            None => FocusPolicy::Hyperfocal,
        }
    }

    pub fn unit(&self) -> BlurUnit {
        if self.mm {
            BlurUnit::Millimetres
        } else {
            BlurUnit::Pixels
        }
    }

    pub fn grid(&self) -> AppResult<DistanceGrid> {
        Ok(DistanceGrid::dense_until(self.dense_until, self.max_distance)?)
    }
}

/// Output format for sweep exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct SweepExport<'a> {
    unit: &'a str,
    threshold: f64,
    series: &'a [SweepSeries],
}

/// Print the lens report for one profile and detection requirement
pub fn print_report(
    profile_args: &ProfileArgs,
    detection_args: &DetectionArgs,
    focus: Option<f64>,
) -> AppResult<()> {
    let profile = profile_args.resolve()?;
    let detection = detection_args.resolve()?;

    let blur_mm = profile.acceptable_blur_mm()?;
    let hyperfocal_mm = profile.hyperfocal_mm()?;
    let policy = match focus {
        Some(focus_m) => FocusPolicy::Fixed(focus_m),
        None => FocusPolicy::Hyperfocal,
    };
    let focus_m = policy.resolve(profile.focal_length_mm, profile.f_number, blur_mm)?;
    let sensor_mm = optics::sensor_distance(focus_m, profile.focal_length_mm)?;
    let dof = optics::depth_of_field(
        profile.focal_length_mm,
        focus_m * units::MM_PER_M,
        hyperfocal_mm,
    )?;

    println!("Camera profile: {} ({})", profile.name, profile.description);
    println!(
        "  FoV {:.2} deg | {} px | {}mm | f/{:.1} | pitch {:.2} um",
        profile.fov_deg,
        profile.resolution_px,
        profile.focal_length_mm,
        profile.f_number,
        profile.pixel_pitch_um
    );
    println!();
    println!(
        "Acceptable blur: {:.1} px ({:.4} mm)",
        profile.acceptable_blur_px, blur_mm
    );
    println!(
        "Hyperfocal distance: {:.2} mm ({})",
        hyperfocal_mm,
        format_distance_m(hyperfocal_mm / units::MM_PER_M)
    );
    let focus_kind = match policy {
        FocusPolicy::Hyperfocal => "hyperfocal",
        FocusPolicy::Fixed(_) => "fixed",
    };
    println!(
        "Focus distance: {} ({})",
        format_distance_m(focus_m),
        focus_kind
    );
    println!("Lens-to-sensor distance: {:.4} mm", sensor_mm);
    let far_str = match dof.far.finite_mm() {
        Some(far_mm) => format_distance_m(far_mm / units::MM_PER_M),
        None => "infinity".to_string(),
    };
    println!(
        "Depth of field: from {} to {}",
        format_distance_m(dof.near_mm / units::MM_PER_M),
        far_str
    );
    println!();

    let feature_px = optics::target_size_px(
        detection.reference_distance_m,
        profile.fov_deg,
        profile.resolution_px,
        detection.feature_size_m,
    )?;
    let max_distance = optics::max_target_distance(
        profile.fov_deg,
        profile.resolution_px,
        detection.min_feature_px,
        detection.feature_size_m,
    )?;
    let min_distance = optics::min_target_distance_with_coverage(
        profile.fov_deg,
        detection.feature_size_m,
        detection.coverage,
    )?;
    let min_fov = optics::min_field_of_view(
        detection.reference_distance_m,
        detection.feature_size_m,
    )?;

    println!("Feature size: {:.2} m", detection.feature_size_m);
    println!(
        "Apparent size at {}: {} px",
        format_distance_m(detection.reference_distance_m),
        feature_px
    );
    println!(
        "Max detection distance ({} px minimum): {}",
        detection.min_feature_px,
        format_distance_m(max_distance)
    );
    println!(
        "Min approach distance ({:.0}% coverage): {}",
        detection.coverage * 100.0,
        format_distance_m(min_distance)
    );
    println!(
        "Min field of view at {}: {:.2} deg",
        format_distance_m(detection.reference_distance_m),
        min_fov
    );

    Ok(())
}

/// Export a blur sweep as CSV or JSON
pub fn export_sweep(
    profile_args: &ProfileArgs,
    sweep_args: &SweepArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let profile = profile_args.resolve()?;
    let request = sweep_args.request();
    let grid = sweep_args.grid()?;
    let unit = sweep_args.unit();
    let series = request.build(&profile, sweep_args.policy(), unit, &grid)?;
    let threshold = focal::sweep::threshold_in_unit(&profile, unit)?;

    let contents = match format {
        ExportFormat::Csv => render_csv(&series)?,
        ExportFormat::Json => {
            let export = SweepExport {
                unit: unit.display_name(),
                threshold,
                series: &series,
            };
            let mut text = serde_json::to_string_pretty(&export)?;
            text.push('\n');
            text
        }
    };

    match output {
        Some(path) => {
            // A directory target gets a timestamped filename
            let path = if path.is_dir() {
                let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                path.join(format!("sweep_{}.{}", timestamp, format.extension()))
            } else {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }
                path
            };
            std::fs::write(&path, contents)?;
            println!("Sweep saved: {}", path.display());
        }
        None => print!("{}", contents),
    }

    Ok(())
}

/// Show the interactive blur chart
pub fn show_chart(profile_args: &ProfileArgs, sweep_args: &SweepArgs) -> AppResult<()> {
    let profile = profile_args.resolve()?;
    let request = sweep_args.request();
    let grid = sweep_args.grid()?;
    terminal::run(
        &profile,
        &request,
        sweep_args.policy(),
        sweep_args.unit(),
        &grid,
    )
}

/// Print usable distance bands for candidate fields of view
pub fn print_coverage(
    profile_args: &ProfileArgs,
    detection_args: &DetectionArgs,
    fovs: &[f64],
) -> AppResult<()> {
    let profile = profile_args.resolve()?;
    let detection = detection_args.resolve()?;

    println!(
        "Distance bands for a {:.2} m feature, {} px minimum, {} px sensor:",
        detection.feature_size_m, detection.min_feature_px, profile.resolution_px
    );
    println!();
    for &fov_deg in fovs {
        let min_distance = optics::min_target_distance_with_coverage(
            fov_deg,
            detection.feature_size_m,
            detection.coverage,
        )?;
        let max_distance = optics::max_target_distance(
            fov_deg,
            profile.resolution_px,
            detection.min_feature_px,
            detection.feature_size_m,
        )?;
        println!(
            "  {:>5.1} deg: min {:>10}  max {:>10}",
            fov_deg,
            format_distance_m(min_distance),
            format_distance_m(max_distance)
        );
    }

    Ok(())
}

/// List the built-in camera profiles
pub fn list_profiles() -> AppResult<()> {
    println!("Built-in camera profiles:");
    println!();
    for profile in config::builtins() {
        let hyperfocal_mm = profile.hyperfocal_mm()?;
        println!("  {:<12} {}", profile.name, profile.description);
        println!(
            "  {:<12} FoV {:.2} deg, {} px, {}mm, f/{:.1}, pitch {:.1} um, hyperfocal {}",
            "",
            profile.fov_deg,
            profile.resolution_px,
            profile.focal_length_mm,
            profile.f_number,
            profile.pixel_pitch_um,
            format_distance_m(hyperfocal_mm / units::MM_PER_M)
        );
        println!();
    }

    Ok(())
}

/// Wide CSV: a distance column and one blur column per series
fn render_csv(series: &[SweepSeries]) -> AppResult<String> {
    let Some(first) = series.first() else {
        return Err(AppError::Other("nothing to export".into()));
    };

    let mut out = String::new();
    out.push_str("distance_m");
    for s in series {
        // Labels contain commas, so they are quoted
        out.push_str(&format!(",\"{}\"", s.label));
    }
    out.push('\n');

    for (row, &(distance_m, _)) in first.points.iter().enumerate() {
        out.push_str(&format!("{:.4}", distance_m));
        for s in series {
            out.push_str(&format!(",{:.6}", s.points[row].1));
        }
        out.push('\n');
    }

    Ok(out)
}
