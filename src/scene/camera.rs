use glam::{DMat4, DVec2, DVec3, DVec4};

/// Minimal guaranteed vertical field of view, in degrees.
const MIN_FOV_DEG: f64 = 60.0;

/// Window size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Perspective viewing frustum in the eye-space convention where the camera
/// looks down -Z, so `near` and `far` are negative.
///
/// The vertical FOV is not fixed: the 60° minimum is guaranteed on the
/// wider window axis, and when the window is taller than wide the vertical
/// FOV widens so the horizontal one never drops below the minimum.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Frustum {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fov_y_deg: MIN_FOV_DEG,
            near: -0.1,
            far: -50.0,
        }
    }

    /// Recomputes the vertical FOV for a window size. Call on resize.
    pub fn update_fov(&mut self, viewport: Viewport) {
        if viewport.width >= viewport.height {
            self.fov_y_deg = MIN_FOV_DEG;
        } else {
            let half_min = (MIN_FOV_DEG * 0.5).to_radians();
            let h = f64::from(viewport.height);
            let w = f64::from(viewport.width);
            self.fov_y_deg =
                2.0 * f64::atan2(half_min.sin() * h / w, half_min.cos()).to_degrees();
        }
    }

    /// Projection matrix for the rendering collaborator (negative
    /// near/far convention, column-major).
    #[must_use]
    pub fn projection_matrix(&self, viewport: Viewport) -> DMat4 {
        let f = 1.0 / (self.fov_y_deg * 0.5).to_radians().tan();
        let aspect = viewport.aspect();
        let depth = self.far - self.near;
        DMat4::from_cols(
            DVec4::new(f / aspect, 0.0, 0.0, 0.0),
            DVec4::new(0.0, f, 0.0, 0.0),
            DVec4::new(0.0, 0.0, (self.far + self.near) / depth, -1.0),
            DVec4::new(0.0, 0.0, -2.0 * self.far * self.near / depth, 0.0),
        )
    }

    /// Projects an eye-space point (z < 0) to window coordinates, origin
    /// at the bottom-left pixel center.
    #[must_use]
    pub fn screen_space_coord(&self, p_eye: DVec3, viewport: Viewport) -> DVec2 {
        debug_assert!(p_eye.z < 0.0, "cannot project a point at or behind the eye");
        let f = 1.0 / (self.fov_y_deg * 0.5).to_radians().tan();
        let ndc = DVec2::new(f / viewport.aspect() * p_eye.x, f * p_eye.y) / -p_eye.z;
        let w = f64::from(viewport.width);
        let h = f64::from(viewport.height);
        DVec2::new(
            ndc.x * w * 0.5 + (w - 1.0) * 0.5,
            ndc.y * h * 0.5 + (h - 1.0) * 0.5,
        )
    }

    /// How many eye-space units one screen pixel spans at depth `z`
    /// (z < 0). Used so dragged objects track the cursor regardless of
    /// their distance from the camera.
    #[must_use]
    pub fn screen_to_eye_scale(&self, z: f64, viewport: Viewport) -> f64 {
        -z * (self.fov_y_deg * 0.5).to_radians().tan() * 2.0 / f64::from(viewport.height)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self::new()
    }
}
