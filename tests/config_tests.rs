// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for camera profiles

use focal::CameraProfile;
use focal::config::{self, DetectionSpec};
use focal::errors::AppError;
use std::fs;

#[test]
fn test_builtin_profiles_validate() {
    let profiles = config::builtins();
    assert_eq!(profiles.len(), 3);
    for profile in &profiles {
        profile.validate().unwrap();
        assert!(
            !profile.description.is_empty(),
            "Profile {} should carry a description",
            profile.name
        );
        // Every built-in focuses somewhere beyond its own focal length
        assert!(profile.hyperfocal_mm().unwrap() > profile.focal_length_mm);
    }
}

#[test]
fn test_find_builtin_is_case_insensitive() {
    assert!(config::find_builtin("DOCKING").is_some());
    assert!(config::find_builtin("Rendezvous").is_some());
    assert!(config::find_builtin("thermal").is_none());
}

#[test]
fn test_detection_spec_defaults() {
    // The default spec matches a 10 cm feature seen from one metre
    let spec = DetectionSpec::default();
    spec.validate().unwrap();
    assert!((spec.feature_size_m - 0.1).abs() < 1e-12);
    assert_eq!(spec.min_feature_px, 10);
    assert!((spec.coverage - 0.9).abs() < 1e-12);
    assert!((spec.reference_distance_m - 1.0).abs() < 1e-12);
}

#[test]
fn test_profile_validation_rejects_bad_values() {
    let mut profile = config::find_builtin("docking").unwrap();
    profile.f_number = 0.0;
    assert!(profile.validate().is_err());

    let mut profile = config::find_builtin("docking").unwrap();
    profile.name = "  ".into();
    let err = profile.validate().unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn test_load_applies_serde_defaults() {
    let path = std::env::temp_dir().join(format!("focal_profile_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"name":"bench","fov_deg":44.0,"resolution_px":1944,"focal_length_mm":8.0,"f_number":2.8}"#,
    )
    .unwrap();

    let profile = CameraProfile::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    // Fields absent from the file fall back to the shared defaults
    assert_eq!(profile.name, "bench");
    assert!(profile.description.is_empty());
    assert!((profile.pixel_pitch_um - 2.2).abs() < 1e-12);
    assert!((profile.acceptable_blur_px - 4.0).abs() < 1e-12);
}

#[test]
fn test_profile_json_roundtrip() {
    let profile = config::find_builtin("rendezvous").unwrap();
    let json = serde_json::to_string(&profile).unwrap();
    let parsed: CameraProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, profile);
}

#[test]
fn test_load_rejects_invalid_profile() {
    let path =
        std::env::temp_dir().join(format!("focal_bad_profile_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"name":"bench","fov_deg":200.0,"resolution_px":1944,"focal_length_mm":8.0,"f_number":2.8}"#,
    )
    .unwrap();

    let result = CameraProfile::load(&path);
    let _ = fs::remove_file(&path);
    assert!(result.is_err(), "A 200 degree field of view should not load");
}
