use glam::DVec3;

use crate::scene::transform::RigidTransform;
use crate::sim::mesh::FurMesh;

/// Upper bound on simulation steps consumed per [`FurSimulation::advance`]
/// call; surplus accumulated time is dropped so a long frame hitch cannot
/// trigger a catch-up spiral.
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Tuning parameters for the hair dynamics and shell derivation.
#[derive(Debug, Clone, Copy)]
pub struct FurParams {
    /// Constant world-space acceleration bias.
    pub gravity: DVec3,
    /// Fixed integration step, in seconds.
    pub time_step: f64,
    /// Velocity retention per step (< 1 bleeds energy so strands settle
    /// into a stable curl instead of oscillating).
    pub damping: f64,
    /// Spring constant pulling each tip toward its ideal extended
    /// position.
    pub stiffness: f64,
    /// Strand rest length; the constraint keeps every tip exactly this
    /// far from its base.
    pub fur_height: f64,
    /// Texture tiling density of the shell coat.
    pub hairyness: f64,
    /// Number of concentric shell layers.
    pub num_shells: usize,
}

impl Default for FurParams {
    fn default() -> Self {
        Self {
            gravity: DVec3::new(0.0, -0.5, 0.0),
            time_step: 0.02,
            damping: 0.96,
            stiffness: 4.0,
            fur_height: 0.21,
            hairyness: 0.7,
            num_shells: 24,
        }
    }
}

/// Per-strand explicit-Euler mass-spring-damper with a fixed-length
/// constraint.
///
/// Hairs are inextensible: the spring only bends their direction, and
/// after every position update the tip is projected back onto the sphere
/// of radius `fur_height` around its base. State lives in world space;
/// bases are re-derived from the mesh and its current world transform
/// every step, so moving or animating the body drags the coat along.
#[derive(Debug, Clone)]
pub struct FurSimulation {
    pub params: FurParams,
    tips: Vec<DVec3>,
    velocities: Vec<DVec3>,
    accumulator: f64,
}

impl FurSimulation {
    /// Initializes every strand at rest: tip at the ideal extended
    /// position, zero velocity.
    #[must_use]
    pub fn new(mesh: &FurMesh, object_to_world: &RigidTransform, params: FurParams) -> Self {
        let mut tips = Vec::with_capacity(mesh.num_hairs());
        for face in 0..mesh.num_faces() {
            for corner in 0..3 {
                let (p, n) = mesh.corner(face, corner);
                tips.push(object_to_world.apply_point(p + n * params.fur_height));
            }
        }
        let velocities = vec![DVec3::ZERO; tips.len()];
        Self {
            params,
            tips,
            velocities,
            accumulator: 0.0,
        }
    }

    /// World-space tip positions, one per face corner.
    #[inline]
    #[must_use]
    pub fn tips(&self) -> &[DVec3] {
        &self.tips
    }

    /// Advances one fixed time step.
    pub fn step(&mut self, mesh: &FurMesh, object_to_world: &RigidTransform) {
        let FurParams {
            gravity,
            time_step,
            damping,
            stiffness,
            fur_height,
            ..
        } = self.params;

        for face in 0..mesh.num_faces() {
            for corner in 0..3 {
                let index = face * 3 + corner;
                let (rest_p, rest_n) = mesh.corner(face, corner);
                let p = object_to_world.apply_point(rest_p);
                let s = p + object_to_world.apply_vector(rest_n) * fur_height;

                let mut t = self.tips[index];
                let mut v = self.velocities[index];

                let force = gravity + (s - t) * stiffness;
                t += v * time_step;
                // Project back onto the fixed-length shell. If the tip
                // lands exactly on the base the direction is undefined;
                // recover along the surface normal.
                let dir = (t - p).normalize_or(object_to_world.apply_vector(rest_n));
                t = p + dir * fur_height;
                v = (v + force * time_step) * damping;

                self.tips[index] = t;
                self.velocities[index] = v;
            }
        }
    }

    /// Feeds `dt` seconds into the fixed-timestep accumulator and runs
    /// whole steps, at most [`MAX_STEPS_PER_FRAME`] per call.
    pub fn advance(&mut self, dt: f64, mesh: &FurMesh, object_to_world: &RigidTransform) {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.params.time_step && steps < MAX_STEPS_PER_FRAME {
            self.step(mesh, object_to_world);
            self.accumulator -= self.params.time_step;
            steps += 1;
        }
        if self.accumulator >= self.params.time_step {
            log::debug!("fur simulation fell behind; dropping surplus time");
            self.accumulator = 0.0;
        }
    }

    /// Re-seats every strand to rest. Used after teleporting the body or
    /// editing parameters that invalidate the state wholesale.
    pub fn reset(&mut self, mesh: &FurMesh, object_to_world: &RigidTransform) {
        *self = Self::new(mesh, object_to_world, self.params);
    }
}
