// Host-side tests for tuning constants, intensity profiles and settings.

use ambient_bg::constants::*;
use ambient_bg::{EngineSettings, Intensity, IntensityProfile, Variant};

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(DEFAULT_DPR_CAP >= 1.0 && DEFAULT_DPR_CAP <= MAX_DPR_CAP);
    assert!(MIN_RESIZE_DEBOUNCE_MS <= DEFAULT_RESIZE_DEBOUNCE_MS);
    assert!(DEFAULT_RESIZE_DEBOUNCE_MS <= MAX_RESIZE_DEBOUNCE_MS);
    assert!(MIN_TARGET_FPS <= DEFAULT_TARGET_FPS && DEFAULT_TARGET_FPS <= MAX_TARGET_FPS);

    // Slack below 1 so frames slightly early still step
    assert!(THROTTLE_SLACK > 0.0 && THROTTLE_SLACK < 1.0);
    assert!(MAX_STEP_MS > REFERENCE_FRAME_MS);
    assert!(POINTER_SMOOTHING > 0.0 && POINTER_SMOOTHING <= 1.0);
}

#[test]
fn depth_multipliers_increase_toward_the_viewer() {
    for table in [DEPTH_SPEED, DEPTH_SIZE, DEPTH_OPACITY, DEPTH_PARALLAX] {
        assert!(table[0] < table[1] && table[1] < table[2], "{table:?}");
        assert!(table.iter().all(|v| *v > 0.0));
    }
    assert!(DEPTH_OPACITY.iter().all(|v| *v <= 1.0));
}

#[test]
fn profiles_scale_with_intensity() {
    for variant in [Variant::ParticleField, Variant::NetworkGraph] {
        let [calm, normal, intense] =
            Intensity::ALL.map(|i| IntensityProfile::for_variant(variant, i));
        assert!(calm.element_count < normal.element_count);
        assert!(normal.element_count < intense.element_count);
        assert!(calm.speed < normal.speed && normal.speed < intense.speed);
        assert!(calm.connection_distance <= normal.connection_distance);
        assert!(normal.connection_distance <= intense.connection_distance);
        assert!(calm.glow_alpha < intense.glow_alpha);
        assert_eq!(normal.intensity, Intensity::Normal);
    }
    let grid = IntensityProfile::for_variant(Variant::ShaderGrid, Intensity::Calm);
    assert_eq!(grid.element_count, 0);
    assert!(grid.shader_gain < 1.0);
}

#[test]
fn network_graph_counts() {
    let counts = Intensity::ALL
        .map(|i| IntensityProfile::for_variant(Variant::NetworkGraph, i).element_count);
    assert_eq!(counts, [25, 40, 60]);
    let p = IntensityProfile::for_variant(Variant::NetworkGraph, Intensity::Normal);
    assert!(p.clear_alpha < 1.0);
}

#[test]
fn largest_profile_fits_link_cap_for_network_graph() {
    let p = IntensityProfile::for_variant(Variant::NetworkGraph, Intensity::Intense);
    assert!(p.element_count <= MAX_LINKED_ELEMENTS);
}

#[test]
fn intensity_parsing_is_lenient() {
    assert_eq!(Intensity::from_preference(Some("calm")), Intensity::Calm);
    assert_eq!(Intensity::from_preference(Some(" intense ")), Intensity::Intense);
    assert_eq!(Intensity::from_preference(Some("LOUD")), Intensity::Normal);
    assert_eq!(Intensity::from_preference(None), Intensity::Normal);
    assert!("bogus".parse::<Intensity>().is_err());
}

#[test]
fn variant_names_and_aliases() {
    for v in [Variant::ParticleField, Variant::NetworkGraph, Variant::ShaderGrid] {
        assert_eq!(v.as_str().parse::<Variant>(), Ok(v));
        assert_eq!(v.to_string(), v.as_str());
    }
    assert_eq!("Network".parse::<Variant>(), Ok(Variant::NetworkGraph));
    assert_eq!("gl".parse::<Variant>(), Ok(Variant::ShaderGrid));
    assert!("fireworks".parse::<Variant>().is_err());
}

#[test]
fn settings_are_clamped() {
    let mut s = EngineSettings::default();
    s.dpr_cap = 10.0;
    s.target_fps = 1000.0;
    s.resize_debounce_ms = 5;
    let s = s.sanitized();
    assert_eq!(s.dpr_cap, MAX_DPR_CAP);
    assert_eq!(s.target_fps, MAX_TARGET_FPS);
    assert_eq!(s.resize_debounce_ms, MIN_RESIZE_DEBOUNCE_MS);

    let mut s = EngineSettings::default();
    s.dpr_cap = f64::NAN;
    s.target_fps = f64::INFINITY;
    let s = s.sanitized();
    assert_eq!(s.dpr_cap, DEFAULT_DPR_CAP);
    assert_eq!(s.target_fps, DEFAULT_TARGET_FPS);
    assert!((s.target_frame_interval_ms() - 1000.0 / 60.0).abs() < 1e-9);
    assert_eq!(s.storage_key, INTENSITY_STORAGE_KEY);
    assert_eq!(s.variant, Variant::ParticleField);
}

#[test]
fn security_mesh_defaults() {
    let s = EngineSettings::for_variant(Variant::SecurityMesh);
    assert_eq!(s.target_fps, MESH_TARGET_FPS);
    assert_eq!(s.target_fps, 30.0);

    let mut s = s;
    s.target_fps = f64::NAN;
    assert_eq!(s.sanitized().target_fps, 30.0);

    assert_eq!("mesh".parse::<Variant>(), Ok(Variant::SecurityMesh));
    assert_eq!(Variant::SecurityMesh.as_str(), "security-mesh");
}

#[test]
fn security_mesh_count_is_clamped_by_area() {
    let p = IntensityProfile::for_variant(Variant::SecurityMesh, Intensity::Normal);
    assert_eq!(p.element_count_for(320.0, 200.0), 8);
    assert_eq!(p.element_count_for(1920.0, 1080.0), 13);
    assert_eq!(p.element_count_for(4000.0, 4000.0), 40);
    assert_eq!(p.element_count_for(0.0, 0.0), 8);

    // fixed-count variants ignore the area
    let p = IntensityProfile::for_variant(Variant::NetworkGraph, Intensity::Normal);
    assert_eq!(p.element_count_for(4000.0, 4000.0), 40);
}
