//! 3D Mathematics Library
//!
//! Vector, matrix and colour types for the Skyline scene.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - column-major 4x4 matrix with transform helpers in [`mat4`]
//! - [`Color`] / [`Hsl`] - linear colour with sRGB and HSL conversions

mod vec3;
pub mod mat4;
pub mod color;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use color::{Color, Hsl};
