#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn viewport() -> ViewportTransform {
    ViewportTransform::new(pt(400.0, 400.0), 0.4, 0.0001)
}

fn wheel(dy: f64) -> InputEvent {
    InputEvent::Wheel(WheelDelta { dx: 0.0, dy })
}

#[test]
fn down_move_up_pans_viewport() {
    let mut vp = viewport();
    InputController::handle(&mut vp, &InputEvent::PointerDown(pt(410.0, 420.0)));
    InputController::handle(&mut vp, &InputEvent::PointerMove(pt(460.0, 400.0)));
    InputController::handle(&mut vp, &InputEvent::PointerUp);
    assert_eq!(vp.base_center(), pt(450.0, 380.0));
    assert!(!vp.is_dragging());
}

#[test]
fn move_without_press_is_ignored() {
    let mut vp = viewport();
    let response = InputController::handle(&mut vp, &InputEvent::PointerMove(pt(10.0, 10.0)));
    assert_eq!(vp.base_center(), pt(400.0, 400.0));
    assert!(!response.prevent_default);
}

#[test]
fn move_after_release_is_ignored() {
    let mut vp = viewport();
    InputController::handle(&mut vp, &InputEvent::PointerDown(pt(400.0, 400.0)));
    InputController::handle(&mut vp, &InputEvent::PointerUp);
    InputController::handle(&mut vp, &InputEvent::PointerMove(pt(0.0, 0.0)));
    assert_eq!(vp.base_center(), pt(400.0, 400.0));
}

#[test]
fn pointer_up_without_press_is_harmless() {
    let mut vp = viewport();
    let response = InputController::handle(&mut vp, &InputEvent::PointerUp);
    assert_eq!(response, InputResponse::default());
    assert!(!vp.is_dragging());
}

#[test]
fn wheel_zooms_and_prevents_default() {
    let mut vp = viewport();
    let response = InputController::handle(&mut vp, &wheel(100.0));
    assert!(response.prevent_default);
    assert!((vp.current().scale - 0.39).abs() < 1e-12);
}

#[test]
fn wheel_ignores_horizontal_delta() {
    let mut vp = viewport();
    InputController::handle(&mut vp, &InputEvent::Wheel(WheelDelta { dx: 500.0, dy: 0.0 }));
    assert_eq!(vp.current().scale, 0.4);
}

#[test]
fn wheel_during_drag_keeps_drag_alive() {
    let mut vp = viewport();
    InputController::handle(&mut vp, &InputEvent::PointerDown(pt(400.0, 400.0)));
    InputController::handle(&mut vp, &wheel(-50.0));
    InputController::handle(&mut vp, &InputEvent::PointerMove(pt(420.0, 400.0)));
    assert!(vp.is_dragging());
    assert_eq!(vp.base_center(), pt(420.0, 400.0));
}

#[test]
fn pointer_events_never_prevent_default() {
    let mut vp = viewport();
    for event in [
        InputEvent::PointerDown(pt(1.0, 1.0)),
        InputEvent::PointerMove(pt(2.0, 2.0)),
        InputEvent::PointerUp,
    ] {
        assert!(!InputController::handle(&mut vp, &event).prevent_default);
    }
}
