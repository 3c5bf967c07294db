#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn defaults_match_reference_display() {
    let config = StageConfig::default();
    assert_eq!(config.zoom_sensitivity, 0.0001);
    assert_eq!(config.default_scale, 0.4);
    assert_eq!(config.anchor, Anchor { x: 0.5, y: 0.5 });
    assert_eq!(config.iris_y, IrisYOffset::Raw);
    assert!(!config.positional_tracking);
    assert!(config.scale_bounds.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn from_json_empty_object_yields_defaults() {
    let config = StageConfig::from_json("{}").expect("empty config should parse");
    assert_eq!(config, StageConfig::default());
}

#[test]
fn from_json_reads_partial_overrides() {
    let config = StageConfig::from_json(
        r#"{"iris_y": "centered", "positional_tracking": true, "anchor": {"x": 0.5, "y": 0.8}}"#,
    )
    .expect("config should parse");
    assert_eq!(config.iris_y, IrisYOffset::Centered);
    assert!(config.positional_tracking);
    assert_eq!(config.anchor.y, 0.8);
    assert_eq!(config.default_scale, 0.4);
}

#[test]
fn from_json_reads_scale_bounds() {
    let config = StageConfig::from_json(r#"{"scale_bounds": {"min": 0.1, "max": 2.0}}"#)
        .expect("config should parse");
    assert_eq!(config.scale_bounds, Some(ScaleBounds { min: 0.1, max: 2.0 }));
}

#[test]
fn from_json_rejects_unknown_iris_mode() {
    let err = StageConfig::from_json(r#"{"iris_y": "sideways"}"#).expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn from_json_rejects_garbage() {
    assert!(matches!(StageConfig::from_json("not json"), Err(ConfigError::Parse(_))));
}

#[test]
fn validate_rejects_zero_sensitivity() {
    let config = StageConfig { zoom_sensitivity: 0.0, ..StageConfig::default() };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotPositive { field: "zoom_sensitivity", .. })
    ));
}

#[test]
fn validate_rejects_negative_default_scale() {
    let config = StageConfig { default_scale: -1.0, ..StageConfig::default() };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotPositive { field: "default_scale", .. })
    ));
}

#[test]
fn validate_rejects_non_finite_anchor() {
    let config = StageConfig { anchor: Anchor { x: f64::NAN, y: 0.5 }, ..StageConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::Anchor { axis: "x", .. })));
}

#[test]
fn validate_rejects_inverted_bounds() {
    let config = StageConfig {
        scale_bounds: Some(ScaleBounds { min: 2.0, max: 1.0 }),
        ..StageConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::InvertedBounds { min: 2.0, max: 1.0 }));
}

#[test]
fn scale_bounds_clamp_both_ends() {
    let bounds = ScaleBounds { min: 0.1, max: 2.0 };
    assert_eq!(bounds.clamp(0.05), 0.1);
    assert_eq!(bounds.clamp(3.0), 2.0);
    assert_eq!(bounds.clamp(0.7), 0.7);
}

#[test]
fn clamp_tolerates_unvalidated_bounds() {
    let inverted = ScaleBounds { min: 2.0, max: 1.0 };
    assert_eq!(inverted.clamp(0.4), 1.0);
    let open_floor = ScaleBounds { min: f64::NAN, max: 1.0 };
    assert_eq!(open_floor.clamp(0.4), 0.4);
    assert_eq!(open_floor.clamp(3.0), 1.0);
}
