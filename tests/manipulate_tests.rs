//! Manipulation tests
//!
//! Tests for:
//! - Manipulation-mode resolution as a pure function of interaction state
//! - Arcball hemisphere directions and two-vector rotations
//! - Drag-to-rotation monotonicity with the pivot in front of the camera
//! - Depth-scaled translation chords
//! - Mixed-frame conjugation and the sky-frame special case
//! - Degenerate pivot (at or behind the eye) producing a no-op

use glam::{DQuat, DVec2, DVec3};
use plume::interact::arcball::{arcball_direction, arcball_rotation};
use plume::interact::manipulate::{
    action_rbt, apply_in_frame, arcball_rbt, drag, manip_mode, mixed_frame, update_arcball_scale,
};
use plume::{
    Frustum, InteractionState, ManipMode, MouseButtons, NodeHandle, RigidTransform, SceneGraph,
    SkyMode, Viewport,
};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: DVec3, b: DVec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Sky camera at (0, 0.25, 4) looking down -Z, one manipulable object at
/// the world origin, 512x512 window with a 128-pixel arcball.
struct Rig {
    graph: SceneGraph,
    state: InteractionState,
    frustum: Frustum,
    viewport: Viewport,
    object: NodeHandle,
}

fn rig() -> Rig {
    let mut graph = SceneGraph::new();
    let sky = graph
        .add_transform(
            graph.root(),
            RigidTransform::from_translation(DVec3::new(0.0, 0.25, 4.0)),
        )
        .unwrap();
    let object = graph
        .add_transform(graph.root(), RigidTransform::IDENTITY)
        .unwrap();
    let mut state = InteractionState::new(sky);
    state.arcball_screen_radius = 128.0;
    Rig {
        graph,
        state,
        frustum: Frustum::new(),
        viewport: Viewport::new(512, 512),
        object,
    }
}

// ============================================================================
// Mode resolution
// ============================================================================

#[test]
fn mode_picked_object_is_arcball_on_picked() {
    let mut r = rig();
    r.state.picked = Some(r.object);
    assert_eq!(manip_mode(&r.state), ManipMode::ArcballOnPicked);
}

#[test]
fn mode_nothing_picked_world_sky_is_arcball_on_sky() {
    let r = rig();
    assert_eq!(r.state.sky_mode, SkyMode::WorldSky);
    assert_eq!(manip_mode(&r.state), ManipMode::ArcballOnSky);
}

#[test]
fn mode_nothing_picked_sky_sky_is_ego() {
    let mut r = rig();
    r.state.sky_mode = SkyMode::SkySky;
    assert_eq!(manip_mode(&r.state), ManipMode::EgoMotion);
}

#[test]
fn mode_picked_equals_camera_falls_back() {
    let mut r = rig();
    // Picking the sky while viewing from it behaves as if nothing were
    // picked.
    r.state.picked = Some(r.state.sky);
    assert_eq!(manip_mode(&r.state), ManipMode::ArcballOnSky);

    // Viewing from the picked object is ego-motion.
    r.state.camera = r.object;
    r.state.picked = Some(r.object);
    assert_eq!(manip_mode(&r.state), ManipMode::EgoMotion);
}

#[test]
fn arcball_frame_follows_the_mode() {
    let mut r = rig();
    // World-sky pivots on the world origin.
    assert!(vec3_approx(
        arcball_rbt(&r.state, &r.graph).translation,
        DVec3::ZERO
    ));
    // Picked pivots on the picked node's world frame.
    r.graph.set_rbt(
        r.object,
        RigidTransform::from_translation(DVec3::new(0.0, 1.0, -2.0)),
    );
    r.state.picked = Some(r.object);
    assert!(vec3_approx(
        arcball_rbt(&r.state, &r.graph).translation,
        DVec3::new(0.0, 1.0, -2.0)
    ));
}

// ============================================================================
// Arcball construction
// ============================================================================

#[test]
fn direction_inside_radius_lies_on_front_hemisphere() {
    let r = 128.0;
    let p = DVec2::new(30.0, 40.0);
    let dir = arcball_direction(p, r);
    assert!(approx_eq(dir.length(), 1.0));
    let expected_z = (r * r - p.length_squared()).sqrt() / r;
    assert!(approx_eq(dir.z, expected_z), "got {}", dir.z);
    assert!(approx_eq(dir.x, p.x / r));
    assert!(approx_eq(dir.y, p.y / r));
}

#[test]
fn direction_outside_radius_projects_to_equator() {
    let dir = arcball_direction(DVec2::new(200.0, 0.0), 128.0);
    assert!(vec3_approx(dir, DVec3::X));

    let diag = arcball_direction(DVec2::new(300.0, 300.0), 128.0);
    assert!(approx_eq(diag.z, 0.0));
    assert!(approx_eq(diag.length(), 1.0));
}

#[test]
fn rotation_between_axes_doubles_the_angle() {
    // The arcball doubles the swept angle: X to Y yields a half-turn
    // about Z.
    let q = arcball_rotation(DVec3::X, DVec3::Y);
    assert!(approx_eq(q.w, 0.0));
    assert!(vec3_approx(DVec3::new(q.x, q.y, q.z), DVec3::Z));
    let rotated = q * DVec3::X;
    assert!(vec3_approx(rotated, -DVec3::X), "got {rotated:?}");
}

#[test]
fn rotation_between_equal_vectors_is_identity() {
    let v = DVec3::new(0.6, 0.0, 0.8);
    let q = arcball_rotation(v, v);
    assert!(approx_eq(q.w.abs(), 1.0));
}

// ============================================================================
// Drag rotation: pivot in front of the camera
// ============================================================================

#[test]
fn horizontal_drag_rotates_about_y_with_monotonic_angle() {
    let mut r = rig();
    r.state.picked = Some(r.object);
    r.state.buttons = MouseButtons::LEFT;

    // Start the drag on the pivot's screen projection so the start
    // direction is the hemisphere apex.
    let eye_inv = r.graph.world_rbt(r.state.camera).inverse();
    let center_eye = eye_inv.apply_point(DVec3::ZERO);
    r.state.cursor = r.frustum.screen_space_coord(center_eye, r.viewport);

    let mut last_angle = 0.0;
    for dx in [2.0, 5.0, 10.0, 20.0, 40.0, 80.0] {
        let m = action_rbt(&r.state, &r.graph, &r.frustum, r.viewport, dx, 0.0);
        let (axis, angle) = m.rotation.to_axis_angle();
        assert!(angle > 0.0, "dx={dx}: rotation must be non-zero");
        assert!(
            axis.y > 0.999,
            "dx={dx}: expected a rotation about +Y, axis={axis:?}"
        );
        assert!(
            angle > last_angle,
            "dx={dx}: angle {angle} not monotonic (last {last_angle})"
        );
        last_angle = angle;
    }
}

#[test]
fn pivot_behind_the_camera_degenerates_to_a_noop() {
    let mut r = rig();
    // Object behind the eye (camera sits at z = 4 looking down -Z).
    let parked = RigidTransform::from_translation(DVec3::new(0.0, 0.0, 8.0));
    r.graph.set_rbt(r.object, parked);
    r.state.picked = Some(r.object);
    r.state.buttons = MouseButtons::LEFT;
    r.state.cursor = DVec2::new(256.0, 256.0);

    drag(
        &mut r.state,
        &mut r.graph,
        &r.frustum,
        r.viewport,
        DVec2::new(266.0, 256.0),
    );

    let after = r.graph.rbt(r.object).unwrap();
    assert!(vec3_approx(after.translation, parked.translation));
    assert!(approx_eq(after.rotation.dot(DQuat::IDENTITY).abs(), 1.0));
}

// ============================================================================
// Translation chords
// ============================================================================

#[test]
fn right_drag_translates_in_the_screen_plane() {
    let mut r = rig();
    r.state.picked = Some(r.object);
    r.state.buttons = MouseButtons::RIGHT;
    update_arcball_scale(&mut r.state, &r.graph, &r.frustum, r.viewport);
    let scale = r.state.arcball_scale;
    assert!(scale > 0.0);

    r.state.cursor = DVec2::new(100.0, 100.0);
    drag(
        &mut r.state,
        &mut r.graph,
        &r.frustum,
        r.viewport,
        DVec2::new(110.0, 100.0),
    );

    let after = r.graph.rbt(r.object).unwrap();
    assert!(
        vec3_approx(after.translation, DVec3::new(10.0 * scale, 0.0, 0.0)),
        "got {:?}",
        after.translation
    );
}

#[test]
fn chord_left_right_translates_along_depth() {
    let mut r = rig();
    r.state.picked = Some(r.object);
    r.state.buttons = MouseButtons::LEFT | MouseButtons::RIGHT;
    update_arcball_scale(&mut r.state, &r.graph, &r.frustum, r.viewport);
    let scale = r.state.arcball_scale;

    r.state.cursor = DVec2::new(100.0, 100.0);
    drag(
        &mut r.state,
        &mut r.graph,
        &r.frustum,
        r.viewport,
        DVec2::new(100.0, 85.0),
    );

    // Dragging downward (dy = -15) pushes the object toward the camera.
    let after = r.graph.rbt(r.object).unwrap();
    assert!(
        vec3_approx(after.translation, DVec3::new(0.0, 0.0, 15.0 * scale)),
        "got {:?}",
        after.translation
    );
}

#[test]
fn translation_scale_tracks_pivot_depth() {
    let mut r = rig();
    r.state.picked = Some(r.object);
    update_arcball_scale(&mut r.state, &r.graph, &r.frustum, r.viewport);
    // Pivot at the origin, eye at z = 4: one pixel spans the eye-space
    // height of a pixel at depth 4.
    let expected = r.frustum.screen_to_eye_scale(-4.0, r.viewport);
    assert!(approx_eq(r.state.arcball_scale, expected));
}

#[test]
fn degenerate_depth_falls_back_to_fixed_scale() {
    let mut r = rig();
    // Ego mode: the pivot is the camera itself, depth is zero.
    r.state.sky_mode = SkyMode::SkySky;
    update_arcball_scale(&mut r.state, &r.graph, &r.frustum, r.viewport);
    assert!(approx_eq(r.state.arcball_scale, 0.02));
}

// ============================================================================
// Frames and conjugation
// ============================================================================

#[test]
fn mixed_frame_takes_translation_and_orientation_apart() {
    let obj = RigidTransform::new(DVec3::new(1.0, 2.0, 3.0), DQuat::from_rotation_z(0.8));
    let eye = RigidTransform::new(DVec3::new(-5.0, 0.0, 9.0), DQuat::from_rotation_y(1.1));
    let mixed = mixed_frame(&obj, &eye);
    assert!(vec3_approx(mixed.translation, obj.translation));
    assert!(mixed.rotation.dot(eye.rotation).abs() > 1.0 - EPSILON);
}

#[test]
fn conjugated_rotation_orbits_the_frame_origin() {
    // Rotating 90 degrees about Y in a frame centered at (2,0,0) carries
    // the world origin to (2,0,2).
    let m = RigidTransform::from_rotation(DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2));
    let a = RigidTransform::from_translation(DVec3::new(2.0, 0.0, 0.0));
    let o = apply_in_frame(&m, &RigidTransform::IDENTITY, &a);
    assert!(
        vec3_approx(o.translation, DVec3::new(2.0, 0.0, 2.0)),
        "got {:?}",
        o.translation
    );
}

// ============================================================================
// Mode-dependent inversion
// ============================================================================

#[test]
fn ego_rotation_is_inverted() {
    let mut r = rig();
    r.state.sky_mode = SkyMode::SkySky;
    r.state.buttons = MouseButtons::LEFT;
    // Free-look (nothing picked): dx of +10 pixels reads as Ry(10 deg),
    // inverted for ego motion.
    let m = action_rbt(&r.state, &r.graph, &r.frustum, r.viewport, 10.0, 0.0);
    let expected = DQuat::from_rotation_y((-10.0_f64).to_radians());
    assert!(m.rotation.dot(expected).abs() > 1.0 - EPSILON);
    assert!(vec3_approx(m.translation, DVec3::ZERO));
}

#[test]
fn sky_translation_is_inverted() {
    let mut r = rig();
    r.state.buttons = MouseButtons::RIGHT;
    update_arcball_scale(&mut r.state, &r.graph, &r.frustum, r.viewport);
    let scale = r.state.arcball_scale;
    let m = action_rbt(&r.state, &r.graph, &r.frustum, r.viewport, 10.0, 0.0);
    assert!(
        vec3_approx(m.translation, DVec3::new(-10.0 * scale, 0.0, 0.0)),
        "got {:?}",
        m.translation
    );
}

#[test]
fn sky_orbit_preserves_distance_to_the_world_origin() {
    let mut r = rig();
    r.state.buttons = MouseButtons::LEFT;
    r.state.cursor = DVec2::new(256.0, 256.0);
    let before = r.graph.rbt(r.state.sky).unwrap();

    drag(
        &mut r.state,
        &mut r.graph,
        &r.frustum,
        r.viewport,
        DVec2::new(286.0, 266.0),
    );

    let after = r.graph.rbt(r.state.sky).unwrap();
    assert!(
        approx_eq(after.translation.length(), before.translation.length()),
        "orbit changed the radius: {} vs {}",
        after.translation.length(),
        before.translation.length()
    );
    assert!(
        after.rotation.dot(before.rotation).abs() < 1.0 - EPSILON,
        "sky frame should have rotated"
    );
}
