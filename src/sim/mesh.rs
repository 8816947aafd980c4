use std::f64::consts::PI;

use glam::DVec3;

/// Indexed triangle mesh with per-vertex normals, the substrate fur grows
/// on.
///
/// Vertex normals are computed once at construction by averaging the
/// normals of every incident face (equal weights, matching the classic
/// one-ring average). Hairs are addressed per face corner (3 per face),
/// so corners sharing a mesh vertex carry independent strands.
#[derive(Debug, Clone)]
pub struct FurMesh {
    positions: Vec<DVec3>,
    normals: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
}

impl FurMesh {
    /// Builds a mesh and its averaged vertex normals.
    ///
    /// Degenerate faces contribute a zero normal; a vertex with no
    /// non-degenerate incident face falls back to +Y.
    #[must_use]
    pub fn new(positions: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        let mut sums = vec![DVec3::ZERO; positions.len()];
        let mut counts = vec![0u32; positions.len()];
        for face in &faces {
            let [a, b, c] = face.map(|i| positions[i as usize]);
            let n = (b - a).cross(c - a).normalize_or(DVec3::ZERO);
            for &i in face {
                sums[i as usize] += n;
                counts[i as usize] += 1;
            }
        }
        let normals = sums
            .iter()
            .zip(&counts)
            .map(|(&sum, &count)| {
                if count == 0 {
                    DVec3::Y
                } else {
                    (sum / f64::from(count)).normalize_or(DVec3::Y)
                }
            })
            .collect();
        Self {
            positions,
            normals,
            faces,
        }
    }

    #[inline]
    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// One hair per face corner.
    #[inline]
    #[must_use]
    pub fn num_hairs(&self) -> usize {
        self.faces.len() * 3
    }

    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    #[inline]
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Rest position and normal at corner `corner` (0..3) of face `face`.
    #[inline]
    #[must_use]
    pub fn corner(&self, face: usize, corner: usize) -> (DVec3, DVec3) {
        let index = self.faces[face][corner] as usize;
        (self.positions[index], self.normals[index])
    }

    /// Latitude/longitude sphere, the stand-in body for demos and tests.
    #[must_use]
    pub fn uv_sphere(radius: f64, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut positions = Vec::new();
        for y in 0..=height_segments {
            // Latitude from the south pole up.
            let theta = f64::from(y) / f64::from(height_segments) * PI;
            let py = -radius * theta.cos();
            let ring_radius = radius * theta.sin();
            for x in 0..=width_segments {
                let phi = f64::from(x) / f64::from(width_segments) * 2.0 * PI;
                positions.push(DVec3::new(
                    -ring_radius * phi.cos(),
                    py,
                    ring_radius * phi.sin(),
                ));
            }
        }

        let stride = width_segments + 1;
        let mut faces = Vec::new();
        for y in 0..height_segments {
            for x in 0..width_segments {
                let v0 = y * stride + x;
                let v1 = v0 + 1;
                let v2 = (y + 1) * stride + x;
                let v3 = v2 + 1;
                // Pole rows produce degenerate triangles; they carry no
                // area and no hairs worth keeping.
                if y != 0 {
                    faces.push([v0, v1, v2]);
                }
                if y != height_segments - 1 {
                    faces.push([v1, v3, v2]);
                }
            }
        }

        Self::new(positions, faces)
    }
}
