// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the transform, history and gesture engine

use procam::session::{
    DragUpdate, GestureInterpreter, ImageHandle, PinchUpdate, RotateDirection, RotationSlider,
    Session, Transform, script,
};

fn image() -> ImageHandle {
    ImageHandle::from_bytes(vec![0u8; 16]).with_name("test.png")
}

fn session_with_history() -> Session {
    let mut session = Session::default();
    session.select_image_and_activate(image());
    session.commit(Transform::new(1.5, 10.0, 0.0, 0.0));
    session.commit(Transform::new(2.0, 10.0, -5.0, 30.0));
    session.commit(Transform::new(2.5, 0.0, 0.0, 90.0));
    session
}

#[test]
fn test_undo_then_redo_restores_exactly() {
    let mut session = session_with_history();

    for _ in 0..3 {
        let before = session.read();
        session.undo().expect("undo should be possible");
        session.redo().expect("redo should be possible");
        assert_eq!(session.read(), before, "undo+redo must restore the transform");
        session.undo();
    }
}

#[test]
fn test_undo_and_redo_at_bounds_are_noops() {
    let mut session = session_with_history();
    let len = session.history().len();

    assert!(session.redo().is_none(), "redo at the last entry is a no-op");
    assert_eq!(session.history().index(), len - 1);

    while session.undo().is_some() {}
    assert_eq!(session.history().index(), 0);
    assert_eq!(session.read(), Transform::IDENTITY);
    assert!(session.undo().is_none(), "undo at index 0 is a no-op");
    assert_eq!(session.read(), Transform::IDENTITY);
    assert!(!session.can_undo());
    assert!(session.can_redo());
}

#[test]
fn test_commit_within_epsilon_keeps_length() {
    let mut session = session_with_history();
    let len = session.history().len();
    let top = session.read();

    let pushed = session.commit(Transform::new(
        top.scale + 0.0005,
        top.x + 0.05,
        top.y - 0.05,
        top.rotation + 0.05,
    ));
    assert!(!pushed);
    assert_eq!(session.history().len(), len);
}

#[test]
fn test_commit_after_undo_truncates_redo_branch() {
    let mut session = session_with_history();
    session.undo();
    session.undo();

    session.commit(Transform::new(4.0, 0.0, 0.0, 0.0));
    assert_eq!(session.history().len(), 3);
    assert!(!session.can_redo());
}

#[test]
fn test_select_image_resets_everything() {
    let mut session = session_with_history();
    session.undo();

    session.select_image(image());
    assert_eq!(session.read(), Transform::IDENTITY);
    assert_eq!(session.history().entries(), &[Transform::IDENTITY]);
    assert_eq!(session.history().index(), 0);
}

#[test]
fn test_scale_clamped_for_huge_deltas() {
    let mut session = Session::default();
    let mut gestures = GestureInterpreter::new();

    gestures.zoom_by(&mut session, 1e9);
    assert_eq!(session.read().scale, 5.0);
    gestures.zoom_by(&mut session, -1e9);
    assert_eq!(session.read().scale, 0.5);

    gestures.pinch(
        &mut session,
        PinchUpdate {
            scale: f64::INFINITY,
            angle: 0.0,
            last: true,
        },
    );
    assert_eq!(session.read().scale, 5.0);
}

#[test]
fn test_slider_keeps_full_turns() {
    let mut session = Session::default();
    let mut gestures = GestureInterpreter::new();

    for _ in 0..3 {
        gestures.rotate_90(&mut session, RotateDirection::Clockwise);
    }
    assert_eq!(session.read().rotation, 270.0);
    assert_eq!(RotationSlider::display_value(&session), -90.0);

    let len = session.history().len();
    gestures.slider_input(&mut session, 5.0);
    gestures.slider_input(&mut session, 10.0);
    assert_eq!(session.read().rotation, 370.0);
    assert_eq!(session.history().len(), len, "slider moves only preview");

    assert!(gestures.slider_release(&mut session));
    assert_eq!(session.history().current().rotation, 370.0);
}

#[test]
fn test_pinch_scenario() {
    let mut session = Session::default();
    let mut gestures = GestureInterpreter::new();
    session.select_image_and_activate(image());

    for (scale, angle) in [(1.2, 10.0), (1.8, 30.0), (2.1, 40.0)] {
        gestures.pinch(
            &mut session,
            PinchUpdate {
                scale,
                angle,
                last: false,
            },
        );
    }
    assert_eq!(session.history().len(), 1, "no commit before release");

    gestures.pinch(
        &mut session,
        PinchUpdate {
            scale: 2.3,
            angle: 45.0,
            last: true,
        },
    );

    let entries = session.history().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], Transform::IDENTITY);
    assert!((entries[1].scale - 2.3).abs() < 1e-9);
    assert_eq!(entries[1].rotation, 45.0);
    assert_eq!(session.history().index(), 1);

    session.undo();
    assert_eq!(session.history().index(), 0);
    assert_eq!(session.read(), Transform::IDENTITY);
}

#[test]
fn test_one_drag_one_entry() {
    let mut session = Session::default();
    let mut gestures = GestureInterpreter::new();

    for i in 1..=10 {
        gestures.drag(
            &mut session,
            DragUpdate {
                dx: i as f64 * 3.0,
                dy: i as f64,
                last: i == 10,
            },
        );
    }

    assert_eq!(session.history().len(), 2);
    assert_eq!((session.read().x, session.read().y), (30.0, 10.0));
}

#[test]
fn test_script_replay_matches_direct_calls() {
    let events = script::parse(
        r#"[
            {"type": "pinch", "scale": 2.3, "angle": 45, "last": true},
            {"type": "rotate_cw"},
            {"type": "zoom_out"},
            {"type": "undo"}
        ]"#,
    )
    .unwrap();

    let mut session = Session::default();
    let mut gestures = GestureInterpreter::new();
    session.select_image_and_activate(image());
    script::replay(&events, &mut gestures, &mut session);

    assert_eq!(session.history().len(), 4);
    assert_eq!(session.history().index(), 2);
    assert_eq!(session.read().rotation, 135.0);
}
