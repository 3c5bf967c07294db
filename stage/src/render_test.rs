#![allow(clippy::float_cmp)]

use super::*;
use crate::params::RigParam;
use crate::test_support::{RecordingRig, RecordingSurface};

fn placement() -> Placement {
    Placement { x: 120.0, y: 340.0, scale: 0.4 }
}

fn params() -> RigParameterSet {
    RigParameterSet::from_fn(|param| match param {
        RigParam::AngleX => 10.0,
        RigParam::EyeROpen => 0.5,
        _ => 1.0,
    })
}

#[test]
fn applies_placement_to_rig() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface::default();
    render_frame(&mut rig, &mut surface, placement(), None).expect("render");
    assert_eq!(rig.position, (120.0, 340.0));
    assert_eq!(rig.scale, 0.4);
}

#[test]
fn writes_all_twelve_parameters_when_tracked() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface::default();
    let set = params();
    let posed = render_frame(&mut rig, &mut surface, placement(), Some(&set)).expect("render");

    assert!(posed);
    assert_eq!(rig.params.len(), 12);
    assert_eq!(rig.param_writes, 12);
    assert_eq!(rig.param("PARAM_ANGLE_X"), Some(10.0));
    assert_eq!(rig.param("PARAM_EYE_R_OPEN"), Some(0.5));
    assert_eq!(rig.param("PARAM_MOUTH_FORM"), Some(1.0));
}

#[test]
fn untracked_tick_leaves_parameters_alone() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface::default();
    let posed = render_frame(&mut rig, &mut surface, placement(), None).expect("render");
    assert!(!posed);
    assert!(rig.params.is_empty());
    assert_eq!(surface.draws, 1);
}

#[test]
fn rewrites_parameters_every_tick() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface::default();
    let set = params();
    for _ in 0..3 {
        render_frame(&mut rig, &mut surface, placement(), Some(&set)).expect("render");
    }
    assert_eq!(rig.param_writes, 36);
    assert_eq!(rig.updates, 3);
}

#[test]
fn draws_then_composites_once_per_tick() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface::default();
    render_frame(&mut rig, &mut surface, placement(), None).expect("render");
    render_frame(&mut rig, &mut surface, placement(), None).expect("render");
    assert_eq!(surface.draws, 2);
    assert_eq!(surface.composites, 2);
}

#[test]
fn draw_failure_skips_composite() {
    let mut rig = RecordingRig::default();
    let mut surface = RecordingSurface { fail_draw: true, ..RecordingSurface::default() };
    let err = render_frame(&mut rig, &mut surface, placement(), None).expect_err("draw should fail");
    assert_eq!(err, SurfaceError("context lost".to_owned()));
    assert_eq!(surface.composites, 0);
}
