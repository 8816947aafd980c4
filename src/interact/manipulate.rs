//! Mouse-drag manipulation of scene nodes.
//!
//! A 2D drag is turned into a rigid-transform delta `M`, expressed in a
//! mixed auxiliary frame `A` (translation of the manipulated object,
//! orientation of the eye), and applied to the target's parent-local
//! transform as `O' = A * M * A^-1 * O`. The mixed frame is what makes the
//! manipulation pivot around the object while reading rotations in the
//! camera's orientation, for any choice of camera and target.

use glam::{DQuat, DVec2, DVec3};

use crate::interact::arcball::{arcball_direction, arcball_rotation};
use crate::interact::input::{InteractionState, SkyMode};
use crate::scene::camera::{Frustum, Viewport};
use crate::scene::graph::SceneGraph;
use crate::scene::transform::RigidTransform;

/// Depth threshold below which the pivot counts as behind the eye.
const DEPTH_EPS: f64 = 1e-8;

/// Translation scale used for ego-motion and when the pivot is degenerate
/// (at or behind the eye), in eye units per pixel.
const FALLBACK_SCALE: f64 = 0.02;

/// How a drag is interpreted, resolved from the interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipMode {
    /// A node other than the camera is picked; pivot around it.
    ArcballOnPicked,
    /// Nothing picked, viewing from the sky in world-sky mode; pivot
    /// around the world origin.
    ArcballOnSky,
    /// First-person camera motion; rotation sense is inverted since
    /// moving the camera is the optical inverse of moving the world.
    EgoMotion,
}

/// Pure function from interaction state to manipulation mode.
#[must_use]
pub fn manip_mode(state: &InteractionState) -> ManipMode {
    let picked_is_camera = state.picked.is_none_or(|p| p == state.camera);
    if picked_is_camera {
        if state.camera == state.sky && state.sky_mode == SkyMode::WorldSky {
            ManipMode::ArcballOnSky
        } else {
            ManipMode::EgoMotion
        }
    } else {
        ManipMode::ArcballOnPicked
    }
}

/// Whether rotation drags go through the arcball (vs. free-look).
#[must_use]
pub fn should_use_arcball(state: &InteractionState) -> bool {
    state.picked.is_some()
}

/// World frame the arcball pivots around for the current mode.
#[must_use]
pub fn arcball_rbt(state: &InteractionState, graph: &SceneGraph) -> RigidTransform {
    match manip_mode(state) {
        ManipMode::ArcballOnPicked => {
            let picked = state.picked.expect("arcball-on-picked with nothing picked");
            graph.world_rbt(picked)
        }
        ManipMode::ArcballOnSky => RigidTransform::IDENTITY,
        ManipMode::EgoMotion => graph.world_rbt(state.camera),
    }
}

/// Mixed auxiliary frame: translation of `obj`, orientation of `eye`.
#[must_use]
pub fn mixed_frame(obj: &RigidTransform, eye: &RigidTransform) -> RigidTransform {
    obj.trans_fact() * eye.lin_fact()
}

/// Conjugates the delta `m` into frame `a` and composes it onto `o`:
/// `a * m * a^-1 * o`.
#[must_use]
pub fn apply_in_frame(
    m: &RigidTransform,
    o: &RigidTransform,
    a: &RigidTransform,
) -> RigidTransform {
    *a * *m * a.inverse() * *o
}

/// Refreshes the pixel-to-eye translation scale from the pivot's current
/// depth. Skipped by the engine while a translation chord is held.
pub fn update_arcball_scale(
    state: &mut InteractionState,
    graph: &SceneGraph,
    frustum: &Frustum,
    viewport: Viewport,
) {
    let eye_rel = graph.world_rbt(state.camera).inverse() * arcball_rbt(state, graph);
    let depth = eye_rel.translation.z;
    state.arcball_scale = if depth > -DEPTH_EPS {
        FALLBACK_SCALE
    } else {
        frustum.screen_to_eye_scale(depth, viewport)
    };
}

/// Arcball rotation for a drag from screen point `p0` to `p1`.
///
/// Degenerates to the identity when the pivot is numerically at or behind
/// the eye, rather than producing a singular transform.
fn arcball_drag_rotation(
    state: &InteractionState,
    graph: &SceneGraph,
    frustum: &Frustum,
    viewport: Viewport,
    p0: DVec2,
    p1: DVec2,
) -> RigidTransform {
    let eye_inverse = graph.world_rbt(state.camera).inverse();
    let center_world = arcball_rbt(state, graph).translation;
    let center_eye = eye_inverse.apply_point(center_world);
    if center_eye.z > -DEPTH_EPS {
        return RigidTransform::IDENTITY;
    }
    let center_screen = frustum.screen_space_coord(center_eye, viewport);
    let v0 = arcball_direction(p0 - center_screen, state.arcball_screen_radius);
    let v1 = arcball_direction(p1 - center_screen, state.arcball_screen_radius);
    RigidTransform::from_rotation(arcball_rotation(v0, v1))
}

/// The "action" transform for a drag delta of `(dx, dy)` pixels, before
/// conjugation into the auxiliary frame.
///
/// Rotate chord: arcball when something is picked, free-look otherwise
/// (one degree per pixel). Translation chords scale pixels by the
/// depth-dependent arcball scale so on-screen motion is
/// distance-independent. Sky and ego modes invert the delta as required
/// by their frame of reference.
#[must_use]
pub fn action_rbt(
    state: &InteractionState,
    graph: &SceneGraph,
    frustum: &Frustum,
    viewport: Viewport,
    dx: f64,
    dy: f64,
) -> RigidTransform {
    let mode = manip_mode(state);
    let mut m = RigidTransform::IDENTITY;

    if state.rotating() {
        m = if should_use_arcball(state) {
            arcball_drag_rotation(
                state,
                graph,
                frustum,
                viewport,
                state.cursor,
                state.cursor + DVec2::new(dx, dy),
            )
        } else {
            RigidTransform::from_rotation(
                DQuat::from_rotation_x((-dy).to_radians()) * DQuat::from_rotation_y(dx.to_radians()),
            )
        };
    } else {
        let scale = if mode == ManipMode::EgoMotion {
            FALLBACK_SCALE
        } else {
            state.arcball_scale
        };
        if state.translating_xy() {
            m = RigidTransform::from_translation(DVec3::new(dx, dy, 0.0) * scale);
        } else if state.translating_z() {
            m = RigidTransform::from_translation(DVec3::new(0.0, 0.0, -dy) * scale);
        }
    }

    match mode {
        ManipMode::ArcballOnPicked => m,
        ManipMode::ArcballOnSky => m.inverse(),
        ManipMode::EgoMotion => {
            if state.rotating() {
                m.inverse()
            } else {
                m
            }
        }
    }
}

/// Consumes a cursor move to `p` (y-up window coordinates) while a button
/// chord is held, applying the resulting delta to the manipulation target.
///
/// Rotating the sky frame itself splits the drag into horizontal and
/// vertical parts applied through two different reference frames (the
/// vertical part through the camera-oriented mixed frame, the horizontal
/// part through a world-oriented frame) so horizontal and vertical drags
/// do not couple.
pub fn drag(
    state: &mut InteractionState,
    graph: &mut SceneGraph,
    frustum: &Frustum,
    viewport: Viewport,
    p: DVec2,
) {
    if !state.dragging() {
        state.cursor = p;
        return;
    }
    let dx = p.x - state.cursor.x;
    let dy = p.y - state.cursor.y;

    let target = match manip_mode(state) {
        ManipMode::ArcballOnPicked => match state.picked {
            Some(node) => node,
            None => return,
        },
        ManipMode::ArcballOnSky => state.sky,
        ManipMode::EgoMotion => state.camera,
    };
    let Some(local) = graph.rbt(target) else {
        log::warn!("manipulation target is not a transform node");
        return;
    };

    let eye = graph.world_rbt(state.camera);
    let a = mixed_frame(&arcball_rbt(state, graph), &eye);
    let a = graph.parent_world_rbt(target).inverse() * a;

    if state.rotating() && target == state.sky {
        let m_y = action_rbt(state, graph, frustum, viewport, dx, 0.0);
        let m_x = action_rbt(state, graph, frustum, viewport, 0.0, dy);
        let b = mixed_frame(&arcball_rbt(state, graph), &RigidTransform::IDENTITY);
        let o = apply_in_frame(&m_x, &local, &a);
        let o = apply_in_frame(&m_y, &o, &b);
        graph.set_rbt(target, o);
    } else {
        let m = action_rbt(state, graph, frustum, viewport, dx, dy);
        graph.set_rbt(target, apply_in_frame(&m, &local, &a));
    }

    state.cursor = p;
}
