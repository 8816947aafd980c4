use std::ops::Mul;

use glam::{DMat4, DQuat, DVec3};

/// A rigid body transform: rotation followed by translation, no scale.
///
/// This is the value type every scene node, keyframe and manipulation delta
/// is built from. It is immutable in spirit: operations never mutate in
/// place, they combine values to produce new ones.
///
/// # Invariant
///
/// The rotation component is a unit quaternion. Every constructor and the
/// composition operator renormalize, so drift from long composition chains
/// never accumulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    #[must_use]
    pub fn new(translation: DVec3, rotation: DQuat) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
        }
    }

    #[must_use]
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    #[must_use]
    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: rotation.normalize(),
        }
    }

    /// The exact inverse: transpose the rotation, rotate and negate the
    /// translation. `a * a.inverse()` is the identity to rounding.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.conjugate();
        Self {
            translation: -(rotation * self.translation),
            rotation,
        }
    }

    /// Transforms a point (rotation then translation).
    #[inline]
    #[must_use]
    pub fn apply_point(&self, p: DVec3) -> DVec3 {
        self.rotation * p + self.translation
    }

    /// Transforms a direction vector (rotation only; vectors ignore
    /// translation).
    #[inline]
    #[must_use]
    pub fn apply_vector(&self, v: DVec3) -> DVec3 {
        self.rotation * v
    }

    /// The pure-translation factor. `trans_fact() * lin_fact()`
    /// reassembles the original transform.
    #[inline]
    #[must_use]
    pub fn trans_fact(&self) -> Self {
        Self::from_translation(self.translation)
    }

    /// The pure-rotation factor.
    #[inline]
    #[must_use]
    pub fn lin_fact(&self) -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: self.rotation,
        }
    }

    /// Column-major 4x4 matrix for the rendering collaborator.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.translation)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for RigidTransform {
    type Output = Self;

    /// Composition: `(a * b)` applies `b` first, then `a`.
    /// Non-commutative; associative to floating-point rounding.
    fn mul(self, rhs: Self) -> Self {
        Self {
            translation: self.translation + self.rotation * rhs.translation,
            rotation: (self.rotation * rhs.rotation).normalize(),
        }
    }
}
