//! 4x4 matrix utilities for 3D transformations
//!
//! Matrices are column-major (`m[column][row]`), matching WGSL's `mat4x4<f32>`
//! memory layout so they can be written to uniform buffers unchanged.
//! Projection helpers target wgpu clip space: depth in `[0, 1]`.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Translation matrix
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = t.x;
    m[3][1] = t.y;
    m[3][2] = t.z;
    m
}

/// Non-uniform scale matrix
pub fn scale(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

/// Rotation about the X axis (radians, right-handed)
pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[1][1] = c;
    m[1][2] = s;
    m[2][1] = -s;
    m[2][2] = c;
    m
}

/// Rotation about the Y axis (radians, right-handed)
pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = c;
    m[0][2] = -s;
    m[2][0] = s;
    m[2][2] = c;
    m
}

/// Rotation about the Z axis (radians, right-handed)
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = c;
    m[0][1] = s;
    m[1][0] = -s;
    m[1][1] = c;
    m
}

/// Rotation from Euler angles applied in XYZ order
///
/// The composed matrix is `Rx * Ry * Rz`, so a point is rotated about Z
/// first and X last (intrinsic X-Y-Z).
pub fn from_euler_xyz(euler: Vec3) -> Mat4 {
    mul(rotation_x(euler.x), mul(rotation_y(euler.y), rotation_z(euler.z)))
}

/// Compose translation, Euler rotation and scale: `T * R * S`
pub fn from_trs(position: Vec3, euler: Vec3, s: Vec3) -> Mat4 {
    mul(translation(position), mul(from_euler_xyz(euler), scale(s)))
}

/// Transform a point (w = 1)
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0, translation ignored)
pub fn transform_vector(m: Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Right-handed perspective projection with depth in `[0, 1]`
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, near * far * nf, 0.0],
    ]
}

/// Right-handed orthographic projection with depth in `[0, 1]`
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rl = 1.0 / (right - left);
    let tb = 1.0 / (top - bottom);
    let nf = 1.0 / (near - far);

    [
        [2.0 * rl, 0.0, 0.0, 0.0],
        [0.0, 2.0 * tb, 0.0, 0.0],
        [0.0, 0.0, nf, 0.0],
        [-(right + left) * rl, -(top + bottom) * tb, near * nf, 1.0],
    ]
}

/// Right-handed look-at view matrix
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [-s.dot(eye), -u.dot(eye), f.dot(eye), 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_mul() {
        let t = translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mul(IDENTITY, t), t);
        assert_eq!(mul(t, IDENTITY), t);
    }

    #[test]
    fn test_rotation_z_maps_x_to_y() {
        let p = transform_point(rotation_z(FRAC_PI_2), Vec3::X);
        assert!(vec_approx_eq(p, Vec3::Y), "got {:?}", p);
    }

    #[test]
    fn test_rotation_x_maps_y_to_z() {
        let p = transform_point(rotation_x(FRAC_PI_2), Vec3::Y);
        assert!(vec_approx_eq(p, Vec3::Z), "got {:?}", p);
    }

    #[test]
    fn test_rotation_y_maps_z_to_x() {
        let p = transform_point(rotation_y(FRAC_PI_2), Vec3::Z);
        assert!(vec_approx_eq(p, Vec3::X), "got {:?}", p);
    }

    #[test]
    fn test_ground_plane_rotation_faces_up() {
        // A +Z facing plane rotated -90 degrees about X faces +Y
        let n = transform_vector(rotation_x(-FRAC_PI_2), Vec3::Z);
        assert!(vec_approx_eq(n, Vec3::Y), "got {:?}", n);
    }

    #[test]
    fn test_trs_order() {
        // Scale, then rotate, then translate
        let m = from_trs(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = transform_point(m, Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 2.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let m = translation(Vec3::splat(100.0));
        assert!(vec_approx_eq(transform_vector(m, Vec3::X), Vec3::X));
    }

    #[test]
    fn test_look_at_moves_target_onto_negative_z() {
        let eye = Vec3::new(0.0, 30.0, 30.0);
        let view = look_at(eye, Vec3::ZERO, Vec3::Y);
        let p = transform_point(view, Vec3::ZERO);
        assert!(p.x.abs() < EPSILON);
        assert!(p.y.abs() < EPSILON);
        assert!((p.z + eye.length()).abs() < 0.001);
    }

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(60f32.to_radians(), 4.0 / 3.0, 0.1, 1000.0);
        let clip = |z: f32| {
            let w = -z;
            (proj[2][2] * z + proj[3][2]) / w
        };
        assert!(clip(-0.1).abs() < 0.001);
        assert!((clip(-1000.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_orthographic_depth_range() {
        let proj = orthographic(-10.0, 10.0, -10.0, 10.0, 1.0, 201.0);
        let near = transform_point(proj, Vec3::new(0.0, 0.0, -1.0));
        let far = transform_point(proj, Vec3::new(0.0, 0.0, -201.0));
        assert!(near.z.abs() < EPSILON);
        assert!((far.z - 1.0).abs() < EPSILON);
    }
}
