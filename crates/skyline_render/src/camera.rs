//! Perspective camera
//!
//! Right-handed, Y-up, looking from `position` towards `target`. The
//! projection maps depth into `[0, 1]` as wgpu expects.

use skyline_input::CameraControl;
use skyline_math::{mat4, Mat4, Vec3};

/// A perspective camera aimed at a target point
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(60.0, 1.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    /// Create a camera at the origin looking down -Z
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// Builder: set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Aim the camera at a point
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio after a resize
    ///
    /// Non-positive or non-finite ratios are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Projection * view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(self.projection_matrix(), self.view_matrix())
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }
}

impl CameraControl for PerspectiveCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn fov_y(&self) -> f32 {
        self.fov.to_radians()
    }

    fn set_view(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }
}
