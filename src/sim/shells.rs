use bytemuck::{Pod, Zeroable};
use glam::{DVec2, DVec3, Vec3};

use crate::scene::transform::RigidTransform;
use crate::sim::fur::FurParams;
use crate::sim::mesh::FurMesh;

/// GPU-facing shell vertex: object-space position, hair-direction normal,
/// shell texture coordinate. Plain old data, castable to bytes for upload
/// by the rendering collaborator.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShellVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// One concentric layer of the coat, three vertices per mesh face.
pub type ShellLayer = Vec<ShellVertex>;

/// The three corner texture patterns; scaled by `hairyness` they control
/// how densely the strand texture tiles across each triangle.
fn corner_uv(corner: usize, hairyness: f64) -> DVec2 {
    match corner {
        0 => DVec2::new(0.0, 0.0),
        1 => DVec2::new(hairyness, 0.0),
        _ => DVec2::new(0.0, hairyness),
    }
}

/// Derives all shell layers from the simulated tips.
///
/// Layer `i` places each corner at fraction `i / num_shells` of the way
/// from the rest surface toward the simulated tip (brought back into
/// object space), with the per-layer increment as its normal. Must be
/// rebuilt whenever the simulation stepped or the body's world transform
/// changed.
#[must_use]
pub fn build_shells(
    mesh: &FurMesh,
    tips_world: &[DVec3],
    object_to_world: &RigidTransform,
    params: &FurParams,
) -> Vec<ShellLayer> {
    assert_eq!(
        tips_world.len(),
        mesh.num_hairs(),
        "tip count does not match the mesh"
    );
    let world_to_object = object_to_world.inverse();
    let num_shells = params.num_shells.max(1);

    let mut layers = Vec::with_capacity(num_shells);
    for shell in 0..num_shells {
        let mut vertices = Vec::with_capacity(mesh.num_hairs());
        for face in 0..mesh.num_faces() {
            for corner in 0..3 {
                let index = face * 3 + corner;
                let (p, _) = mesh.corner(face, corner);
                let tip_object = world_to_object.apply_point(tips_world[index]);
                let increment = (tip_object - p) / num_shells as f64;
                let position = p + increment * shell as f64;
                let uv = corner_uv(corner, params.hairyness);
                vertices.push(ShellVertex {
                    position: Vec3::new(position.x as f32, position.y as f32, position.z as f32)
                        .into(),
                    normal: Vec3::new(increment.x as f32, increment.y as f32, increment.z as f32)
                        .into(),
                    uv: [uv.x as f32, uv.y as f32],
                });
            }
        }
        layers.push(vertices);
    }
    layers
}
