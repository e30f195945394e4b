//! 3D Transform (position, rotation, scale)
//!
//! A Transform represents the placement of a node relative to its parent.

use skyline_math::{mat4, Mat4, Vec3};
use serde::{Serialize, Deserialize};

/// A 3D transform with position, Euler rotation and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent node
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
    /// Per-axis scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Builder: set the Euler rotation
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set a uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Local matrix: scale, then rotation, then translation
    pub fn matrix(&self) -> Mat4 {
        mat4::from_trs(self.position, self.rotation, self.scale)
    }

    /// Transform a point from local space to parent space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        mat4::transform_point(self.matrix(), p)
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 0.0001
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(Transform::identity().transform_point(p), p));
    }

    #[test]
    fn test_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(vec_approx_eq(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_transform_order() {
        // X * 2 = (2, 0, 0), rotated 90° about Z = (0, 2, 0), + (10, 0, 0)
        let t = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2))
            .with_uniform_scale(2.0);
        let p = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 2.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform::identity();
        t.translate(Vec3::new(0.5, 0.0, 0.0));
        t.translate(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(t.position.x, 1.0);
    }

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
