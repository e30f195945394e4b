//! Surface materials
//!
//! Materials describe how a mesh is lit. Two shading models are supported:
//! Phong (buildings, clouds) and a metalness/roughness "standard" model
//! (ground, airplanes). Both map onto the same shader parameters.

use serde::{Serialize, Deserialize};
use skyline_math::Color;

/// Lighting model of a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingModel {
    /// Classic ambient + diffuse + specular highlight
    Phong,
    /// Metalness / roughness parameterisation
    Standard,
}

/// Visual properties of a mesh
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color (linear RGB)
    pub color: Color,
    /// Opacity in `[0, 1]`; only honoured when `transparent` is set
    pub opacity: f32,
    /// Render in the blended pass
    pub transparent: bool,
    /// Use face normals instead of interpolated vertex normals
    pub flat_shading: bool,
    pub roughness: f32,
    pub metalness: f32,
    pub shading: ShadingModel,
}

impl Default for Material {
    fn default() -> Self {
        Self::phong(Color::WHITE)
    }
}

impl Material {
    /// Phong material with the given color
    pub fn phong(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            flat_shading: false,
            roughness: 0.5,
            metalness: 0.0,
            shading: ShadingModel::Phong,
        }
    }

    /// Standard (metalness/roughness) material
    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            opacity: 1.0,
            transparent: false,
            flat_shading: false,
            roughness,
            metalness,
            shading: ShadingModel::Standard,
        }
    }

    /// Builder: make the material transparent with the given opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = true;
        self
    }

    /// Builder: enable flat shading
    pub fn with_flat_shading(mut self) -> Self {
        self.flat_shading = true;
        self
    }

    /// Effective alpha used when drawing
    #[inline]
    pub fn alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }

    /// Specular exponent derived from roughness
    ///
    /// Phong materials default to a shininess of 30; standard materials map
    /// roughness `r` onto `2 / r^4 - 2`, clamped to a usable range.
    pub fn shininess(&self) -> f32 {
        match self.shading {
            ShadingModel::Phong => 30.0,
            ShadingModel::Standard => {
                let r = self.roughness.clamp(0.05, 1.0);
                (2.0 / (r * r * r * r) - 2.0).clamp(1.0, 256.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_default_is_opaque() {
        let m = Material::default();
        assert_eq!(m.alpha(), 1.0);
        assert!(!m.transparent);
        assert_eq!(m.shading, ShadingModel::Phong);
    }

    #[test]
    fn test_with_opacity_marks_transparent() {
        let m = Material::phong(Color::WHITE).with_opacity(0.8);
        assert!(m.transparent);
        assert_eq!(m.alpha(), 0.8);
    }

    #[test]
    fn test_opacity_ignored_when_opaque() {
        let mut m = Material::default();
        m.opacity = 0.2;
        assert_eq!(m.alpha(), 1.0);
    }

    #[test]
    fn test_smoother_surfaces_are_shinier() {
        let rough = Material::standard(Color::WHITE, 0.2, 0.8);
        let smooth = Material::standard(Color::WHITE, 0.9, 0.1);
        assert!(smooth.shininess() > rough.shininess());
    }
}
