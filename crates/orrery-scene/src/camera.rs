//! Fixed look-at camera producing view and projection matrices.

use glam::{Mat4, Vec3};

/// A camera looking from `eye` toward `target`.
///
/// Projection uses reverse-Z: the near plane maps to depth 1.0 and the far
/// plane to 0.0, so the depth test must be `GreaterEqual` with a clear of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin with +Y up.
    pub fn looking_at_origin(eye: Vec3, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio: 4.0 / 3.0,
            near,
            far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Perspective projection with near and far swapped for reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Update the aspect ratio from surface dimensions. Zero sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at_origin(Vec3::new(80.0, 70.0, 60.0), 30.0, 0.1, 1000.0)
    }
}
