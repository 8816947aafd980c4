use glam::{DQuat, DVec2, DVec3};

/// Direction from the arcball center to the point on the virtual
/// hemisphere under a screen position `p` (relative to the ball's screen
/// center), for a ball of screen radius `r`.
///
/// Inside the radius the point lies on the front hemisphere
/// (`z = sqrt(r^2 - |p|^2)`); outside, it is projected radially onto the
/// equator (z = 0). This gives well-defined, non-degenerate rotation for
/// drags anywhere on screen.
#[must_use]
pub fn arcball_direction(p: DVec2, r: f64) -> DVec3 {
    let n2 = p.length_squared();
    if n2 >= r * r {
        p.extend(0.0).normalize()
    } else {
        p.extend((r * r - n2).sqrt()).normalize()
    }
}

/// The rotation taking hemisphere direction `v0` to `v1`, doubled: the
/// classic arcball construction `quat(0, v1) * quat(0, -v0)` using
/// pure-imaginary quaternion multiplication.
#[must_use]
pub fn arcball_rotation(v0: DVec3, v1: DVec3) -> DQuat {
    let q1 = DQuat::from_xyzw(v1.x, v1.y, v1.z, 0.0);
    let q0 = DQuat::from_xyzw(-v0.x, -v0.y, -v0.z, 0.0);
    (q1 * q0).normalize()
}
