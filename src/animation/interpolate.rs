//! Catmull-Rom interpolation over rigid transforms.
//!
//! Both channels are evaluated as cubic Béziers whose inner control points
//! are derived from the four Catmull-Rom controls, using de Casteljau with
//! `lerp` for translations and `slerp` for rotations. The spherical form
//! keeps unit length and constant angular speed, which naive component-wise
//! quaternion blending does not. At `t = 0` the result is exactly the
//! second control point; at `t = 1`, exactly the third.

use glam::{DQuat, DVec3};

use crate::scene::transform::RigidTransform;

const EPS: f64 = 1e-12;

/// Negates the quaternion when its scalar part is negative, picking the
/// representative on the same hemisphere as the identity. Keeps the power
/// below on the shortest arc.
fn cond_negate(q: DQuat) -> DQuat {
    if q.w < 0.0 { -q } else { q }
}

/// Raises a unit quaternion to a real power by scaling its rotation angle.
fn quat_pow(q: DQuat, exponent: f64) -> DQuat {
    let (axis, angle) = q.to_axis_angle();
    if angle.abs() < EPS {
        return DQuat::IDENTITY;
    }
    DQuat::from_axis_angle(axis, angle * exponent)
}

/// Catmull-Rom for translations: Bézier inner controls
/// `d = p1 + (p2 - p0)/6`, `e = p2 - (p3 - p1)/6`.
#[must_use]
pub fn catmull_rom_vec3(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, t: f64) -> DVec3 {
    let d = p1 + (p2 - p0) / 6.0;
    let e = p2 - (p3 - p1) / 6.0;

    let f0 = p1.lerp(d, t);
    let f1 = d.lerp(e, t);
    let f2 = e.lerp(p2, t);
    let g0 = f0.lerp(f1, t);
    let g1 = f1.lerp(f2, t);
    g0.lerp(g1, t)
}

/// Spherical Catmull-Rom for rotations: the Bézier inner controls are
/// `d = (q2 * q0^-1)^(1/6) * q1` and `e = (q3 * q1^-1)^(-1/6) * q2`, then a
/// slerp de Casteljau ladder.
#[must_use]
pub fn catmull_rom_quat(q0: DQuat, q1: DQuat, q2: DQuat, q3: DQuat, t: f64) -> DQuat {
    let d = quat_pow(cond_negate(q2 * q0.inverse()), 1.0 / 6.0) * q1;
    let e = quat_pow(cond_negate(q3 * q1.inverse()), -1.0 / 6.0) * q2;

    let f0 = q1.slerp(d, t);
    let f1 = d.slerp(e, t);
    let f2 = e.slerp(q2, t);
    let g0 = f0.slerp(f1, t);
    let g1 = f1.slerp(f2, t);
    g0.slerp(g1, t).normalize()
}

/// Interpolates a rigid transform between controls `r1` and `r2`, with
/// `r0`/`r3` shaping the tangents. `t` is the fraction within `[r1, r2]`.
#[must_use]
pub fn catmull_rom_rbt(
    r0: &RigidTransform,
    r1: &RigidTransform,
    r2: &RigidTransform,
    r3: &RigidTransform,
    t: f64,
) -> RigidTransform {
    RigidTransform {
        translation: catmull_rom_vec3(
            r0.translation,
            r1.translation,
            r2.translation,
            r3.translation,
            t,
        ),
        rotation: catmull_rom_quat(r0.rotation, r1.rotation, r2.rotation, r3.rotation, t),
    }
}
