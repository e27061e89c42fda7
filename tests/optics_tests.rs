// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the thin-lens formula core

use focal::config;
use focal::constants::units;
use focal::optics::{self, DofBound};
use focal::sweep::{self, BlurUnit, DistanceGrid, FocusPolicy, SweepRequest};

#[test]
fn test_docking_lens_sizing_numbers() {
    let profile = config::find_builtin("docking").unwrap();

    let coc_mm = profile.acceptable_blur_mm().unwrap();
    assert!((coc_mm - 0.0088).abs() < 1e-12);

    let hyperfocal_mm = profile.hyperfocal_mm().unwrap();
    assert!((hyperfocal_mm - 185.6299).abs() < 1e-3);

    // Focused at the hyperfocal distance the sharp band runs from half the
    // hyperfocal distance out to infinity
    let dof =
        optics::depth_of_field(profile.focal_length_mm, hyperfocal_mm, hyperfocal_mm).unwrap();
    assert!((dof.near_mm - hyperfocal_mm / 2.0).abs() < 1e-9);
    assert_eq!(dof.far, DofBound::Infinite);

    // A 10 cm feature one metre away covers 180 of the 1944 sensor pixels
    let px = optics::target_size_px(1.0, profile.fov_deg, profile.resolution_px, 0.1).unwrap();
    assert_eq!(px, 180);

    // and stays detectable at 10 px out to roughly 18 m
    let max_m =
        optics::max_target_distance(profile.fov_deg, profile.resolution_px, 10, 0.1).unwrap();
    assert!((max_m - 17.99).abs() < 0.05);

    let min_m = optics::min_target_distance_with_coverage(profile.fov_deg, 0.1, 0.9).unwrap();
    assert!((min_m - 0.0926).abs() < 5e-4);

    let min_fov = optics::min_field_of_view(1.0, 0.1).unwrap();
    assert!((min_fov - 5.725).abs() < 1e-2);
}

#[test]
fn test_blur_meets_threshold_at_band_edges() {
    let profile = config::find_builtin("inspection").unwrap();
    let coc_mm = profile.acceptable_blur_mm().unwrap();
    let hyperfocal_mm = profile.hyperfocal_mm().unwrap();

    let dof =
        optics::depth_of_field(profile.focal_length_mm, 5.0 * units::MM_PER_M, hyperfocal_mm)
            .unwrap();
    let far_mm = dof
        .far
        .finite_mm()
        .expect("a 5 m focus sits inside the hyperfocal distance");
    let sensor_mm = optics::sensor_distance(5.0, profile.focal_length_mm).unwrap();

    let blur_at = |distance_m: f64| {
        optics::circle_of_confusion(
            distance_m,
            profile.f_number,
            profile.focal_length_mm,
            sensor_mm,
        )
        .unwrap()
    };

    // At both band edges the blur disk is exactly the acceptable one
    assert!((blur_at(dof.near_mm / units::MM_PER_M) - coc_mm).abs() < 1e-9);
    assert!((blur_at(far_mm / units::MM_PER_M) - coc_mm).abs() < 1e-9);

    // smaller inside the band, larger outside it
    assert!(blur_at(5.0) < coc_mm);
    assert!(blur_at(dof.near_mm / units::MM_PER_M * 0.9) > coc_mm);
    assert!(blur_at(far_mm / units::MM_PER_M * 1.1) > coc_mm);
}

#[test]
fn test_hyperfocal_family_stays_sharp_at_range() {
    let profile = config::find_builtin("docking").unwrap();
    let request = SweepRequest::FNumbers(vec![1.0, 1.2, 1.4, 1.8, 2.0, 2.2, 2.8, 4.0, 5.6]);
    let series = request
        .build(
            &profile,
            FocusPolicy::Hyperfocal,
            BlurUnit::Pixels,
            &DistanceGrid::default(),
        )
        .unwrap();

    assert_eq!(series.len(), 9);
    assert_eq!(series[8].label, "f/5.6, 3mm");

    // The widest aperture has the farthest near limit, just over half a
    // metre, so from one metre out every series holds the threshold
    let threshold = profile.acceptable_blur_px;
    for s in &series {
        for &(distance_m, blur_px) in s.points.iter().filter(|p| p.0 >= 1.0) {
            assert!(
                blur_px <= threshold + 1e-9,
                "{}: {} px at {} m",
                s.label,
                blur_px,
                distance_m
            );
        }
    }
}

#[test]
fn test_sweep_units_scale_by_pixel_pitch() {
    let profile = config::find_builtin("rendezvous").unwrap();
    let grid = DistanceGrid::dense_until(1.0, 3.0).unwrap();
    let px =
        sweep::blur_series(&profile, FocusPolicy::Fixed(2.0), BlurUnit::Pixels, &grid).unwrap();
    let mm = sweep::blur_series(
        &profile,
        FocusPolicy::Fixed(2.0),
        BlurUnit::Millimetres,
        &grid,
    )
    .unwrap();

    let pitch_mm = profile.pixel_pitch_um / units::UM_PER_MM;
    for (p, m) in px.points.iter().zip(mm.points.iter()) {
        assert_eq!(p.0, m.0);
        assert!((p.1 - m.1 / pitch_mm).abs() < 1e-12);
    }
}
