//! Color types
//!
//! [`Color`] stores linear RGB. Colours authored as sRGB hex values or HSL
//! triples are converted on construction so lighting math in the shaders
//! stays linear; the sRGB surface encodes the final pixel.

use serde::{Serialize, Deserialize};

/// A linear RGB color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// A hue/saturation/lightness triple, each component in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from linear components
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from sRGB components in `[0, 1]`
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: srgb_to_linear(r),
            g: srgb_to_linear(g),
            b: srgb_to_linear(b),
        }
    }

    /// Create a color from a 24-bit sRGB hex value (`0xRRGGBB`)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::from_srgb(r, g, b)
    }

    /// Create a color from HSL expressed in sRGB space
    ///
    /// Hue wraps into `[0, 1)`, saturation and lightness are clamped.
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = hsl.h.rem_euclid(1.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::from_srgb(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::from_srgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Convert back to HSL (sRGB space)
    pub fn to_hsl(&self) -> Hsl {
        let [r, g, b] = self.to_srgb();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f32::EPSILON {
            return Hsl::new(0.0, 0.0, l);
        }

        let delta = max - min;
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl::new(h / 6.0, s, l)
    }

    /// sRGB-encoded components
    pub fn to_srgb(&self) -> [f32; 3] {
        [
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        ]
    }

    /// Linear components with alpha appended (for GPU upload)
    pub fn with_alpha(&self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }

    /// Scale all components
    pub fn scaled(&self, k: f32) -> Self {
        Self::linear(self.r * k, self.g * k, self.b * k)
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// sRGB transfer function, encoded → linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// sRGB transfer function, linear → encoded
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    #[test]
    fn test_from_hex_white_and_black() {
        let white = Color::from_hex(0xffffff);
        assert!((white.r - 1.0).abs() < EPSILON);
        assert!((white.g - 1.0).abs() < EPSILON);
        let black = Color::from_hex(0x000000);
        assert_eq!(black, Color::BLACK);
    }

    #[test]
    fn test_srgb_round_trip() {
        for c in [0.0, 0.02, 0.2, 0.5, 0.87, 1.0] {
            assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < EPSILON, "c = {}", c);
        }
    }

    #[test]
    fn test_hsl_primary_red() {
        let red = Color::from_hsl(Hsl::new(0.0, 1.0, 0.5));
        let [r, g, b] = red.to_srgb();
        assert!((r - 1.0).abs() < EPSILON);
        assert!(g.abs() < EPSILON);
        assert!(b.abs() < EPSILON);
    }

    #[test]
    fn test_hsl_recovered_for_building_palette() {
        for i in 0..20 {
            let hue = i as f32 / 20.0;
            let color = Color::from_hsl(Hsl::new(hue, 0.7, 0.6));
            let hsl = color.to_hsl();
            assert!((hsl.s - 0.7).abs() < EPSILON, "saturation at hue {}", hue);
            assert!((hsl.l - 0.6).abs() < EPSILON, "lightness at hue {}", hue);
            assert!((hsl.h - hue).abs() < EPSILON || (hsl.h - hue).abs() > 1.0 - EPSILON);
        }
    }

    #[test]
    fn test_grey_has_zero_saturation() {
        let grey = Color::from_hex(0x555555);
        let hsl = grey.to_hsl();
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 0x55 as f32 / 255.0).abs() < EPSILON);
    }
}
