//! Engine tests
//!
//! Tests for:
//! - Construction, resize-driven FOV and arcball radius
//! - The pick request/complete handshake
//! - End-to-end drags through normalized input events
//! - Playback and fur stepping through the per-frame update
//! - Mode toggles and the arcball draw query

use glam::{DQuat, DVec3};
use plume::{
    Engine, FurMesh, FurParams, MouseButton, NodeHandle, RigidTransform, SkyMode, Viewport,
};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Engine with the sky at (0, 0.25, 4) and one object at the origin.
fn engine_with_object() -> (Engine, NodeHandle) {
    let mut engine = Engine::new(
        Viewport::new(512, 512),
        RigidTransform::from_translation(DVec3::new(0.0, 0.25, 4.0)),
    );
    let root = engine.scene.root();
    let object = engine
        .scene
        .add_transform(root, RigidTransform::IDENTITY)
        .unwrap();
    engine.attach_animator();
    (engine, object)
}

// ============================================================================
// Construction and resize
// ============================================================================

#[test]
fn arcball_radius_tracks_the_window() {
    let (engine, _) = engine_with_object();
    assert!(approx_eq(engine.interaction.arcball_screen_radius, 128.0));
}

#[test]
fn resize_updates_radius_and_fov() {
    let (mut engine, _) = engine_with_object();
    engine.resize(1024, 256);
    assert!(approx_eq(engine.interaction.arcball_screen_radius, 64.0));
    // Wider than tall keeps the minimum vertical FOV.
    assert!(approx_eq(engine.frustum.fov_y_deg, 60.0));

    engine.resize(256, 1024);
    // Taller than wide widens the vertical FOV to protect the horizontal
    // minimum.
    assert!(engine.frustum.fov_y_deg > 60.0);
}

#[test]
fn animator_attach_counts_transform_nodes() {
    let (engine, _) = engine_with_object();
    // The sky frame plus the object.
    assert_eq!(engine.editor.animator().node_count(), 2);
}

// ============================================================================
// Picking handshake
// ============================================================================

#[test]
fn armed_left_click_requests_a_pick() {
    let (mut engine, object) = engine_with_object();
    assert!(
        engine
            .mouse_button(MouseButton::Left, true, 100.0, 100.0)
            .is_none(),
        "unarmed clicks do not pick"
    );
    engine.mouse_button(MouseButton::Left, false, 100.0, 100.0);

    engine.toggle_picking();
    let request = engine
        .mouse_button(MouseButton::Left, true, 100.0, 100.0)
        .expect("armed click must request a pick");
    // Window y is flipped to the bottom-left convention.
    assert!(approx_eq(request.y, 512.0 - 100.0 - 1.0));

    engine.complete_pick(Some(object));
    assert_eq!(engine.interaction.picked, Some(object));
    assert!(!engine.interaction.picking_armed);
}

#[test]
fn completing_with_none_clears_the_selection() {
    let (mut engine, object) = engine_with_object();
    engine.complete_pick(Some(object));
    assert!(engine.interaction.picked.is_some());
    engine.complete_pick(None);
    assert!(engine.interaction.picked.is_none());
}

// ============================================================================
// Drags through normalized events
// ============================================================================

#[test]
fn left_drag_rotates_the_picked_object() {
    let (mut engine, object) = engine_with_object();
    engine.complete_pick(Some(object));
    engine.update(1.0 / 60.0);

    engine.mouse_button(MouseButton::Left, true, 256.0, 256.0);
    engine.cursor_moved(276.0, 256.0);
    engine.mouse_button(MouseButton::Left, false, 276.0, 256.0);

    let after = engine.scene.rbt(object).unwrap();
    assert!(
        after.rotation.dot(DQuat::IDENTITY).abs() < 1.0 - EPSILON,
        "object should have rotated"
    );
}

#[test]
fn right_drag_translates_the_picked_object() {
    let (mut engine, object) = engine_with_object();
    engine.complete_pick(Some(object));
    engine.update(1.0 / 60.0);

    engine.mouse_button(MouseButton::Right, true, 256.0, 256.0);
    engine.cursor_moved(266.0, 256.0);

    let after = engine.scene.rbt(object).unwrap();
    assert!(after.translation.x > 0.0, "object should have moved right");
    assert!(approx_eq(after.translation.y, 0.0));
}

#[test]
fn cursor_moves_without_buttons_do_not_disturb_the_scene() {
    let (mut engine, object) = engine_with_object();
    engine.complete_pick(Some(object));
    engine.cursor_moved(10.0, 20.0);
    engine.cursor_moved(400.0, 300.0);
    let rbt = engine.scene.rbt(object).unwrap();
    assert!(approx_eq(rbt.translation.length(), 0.0));
}

// ============================================================================
// Playback through update()
// ============================================================================

#[test]
fn update_plays_the_clip_and_reseats_the_cursor() {
    let (mut engine, object) = engine_with_object();
    for seed in 0..4 {
        engine
            .scene
            .set_rbt(object, RigidTransform::from_translation(DVec3::X * f64::from(seed)));
        engine.keyframe_new();
    }

    engine.toggle_playback().unwrap();
    assert!(engine.editor.is_playing());

    let mut guard = 0;
    while engine.editor.is_playing() {
        engine.update(1.0);
        guard += 1;
        assert!(guard < 10, "playback never terminated");
    }

    // The clip parks on the second-to-last frame.
    assert_eq!(engine.editor.current(), Some(2));
    let parked = engine.scene.rbt(object).unwrap().translation;
    assert!(approx_eq(parked.x, 2.0), "got {parked:?}");
}

#[test]
fn playback_with_too_few_frames_is_refused() {
    let (mut engine, _) = engine_with_object();
    engine.keyframe_new();
    assert!(engine.toggle_playback().is_err());
    assert!(!engine.editor.is_playing());
}

// ============================================================================
// Fur through update()
// ============================================================================

#[test]
fn update_steps_the_fur_and_exposes_shells() {
    let (mut engine, object) = engine_with_object();
    let mesh = FurMesh::uv_sphere(1.0, 8, 4);
    let params = FurParams::default();
    engine.attach_fur(object, mesh, params);

    let before = engine.fur().unwrap().sim.tips().to_vec();
    engine.update(0.1);
    let after = engine.fur().unwrap().sim.tips();
    assert!(
        before.iter().zip(after).any(|(b, a)| *b != *a),
        "gravity should disturb the rest pose"
    );

    let layers = engine.shell_layers().expect("fur attached");
    assert_eq!(layers.len(), params.num_shells);
}

#[test]
fn fur_parameters_adjust_multiplicatively() {
    let (mut engine, object) = engine_with_object();
    engine.attach_fur(object, FurMesh::uv_sphere(1.0, 8, 4), FurParams::default());

    engine.grow_fur();
    let height = engine.fur().unwrap().sim.params.fur_height;
    assert!(approx_eq(height, 0.21 * 1.05));

    engine.less_hairy();
    let hairyness = engine.fur().unwrap().sim.params.hairyness;
    assert!(approx_eq(hairyness, 0.7 / 1.05));
}

// ============================================================================
// Toggles and the arcball visual
// ============================================================================

#[test]
fn sky_mode_toggles() {
    let (mut engine, _) = engine_with_object();
    assert_eq!(engine.interaction.sky_mode, SkyMode::WorldSky);
    engine.toggle_sky_mode();
    assert_eq!(engine.interaction.sky_mode, SkyMode::SkySky);
    engine.toggle_sky_mode();
    assert_eq!(engine.interaction.sky_mode, SkyMode::WorldSky);
}

#[test]
fn arcball_visual_needs_a_pick_and_the_display_flag() {
    let (mut engine, object) = engine_with_object();
    assert!(engine.arcball_visual().is_none(), "nothing picked yet");

    engine.complete_pick(Some(object));
    engine.update(1.0 / 60.0);
    let (frame, scale) = engine.arcball_visual().expect("picked and displayed");
    assert!(approx_eq(frame.translation.length(), 0.0));
    assert!(scale > 0.0);

    engine.toggle_arcball_display();
    assert!(engine.arcball_visual().is_none());
}
