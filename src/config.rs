//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SKY_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Orbit controls configuration
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Scene layout and population
    #[serde(default)]
    pub scene: SceneConfig,
    /// Per-frame motion of dynamic objects
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`SKY_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // SKY_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("SKY_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Skyline".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub start_position: [f32; 3],
    /// Point the camera initially looks at
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 30.0, 30.0],
            target: [0.0, 0.0, 0.0],
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Orbit controls configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Fraction of accumulated motion applied per frame (0 disables damping)
    pub damping_factor: f32,
    /// Closest allowed distance to the target
    pub min_distance: f32,
    /// Farthest allowed distance to the target
    pub max_distance: f32,
    /// Maximum angle from straight overhead, in degrees
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.05,
            min_distance: 20.0,
            max_distance: 60.0,
            // PI / 2.1 radians
            max_polar_angle: 180.0 / 2.1,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
        }
    }
}

/// Scene layout and population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Random seed; entropy is used when absent
    pub seed: Option<u64>,
    /// Sky and fog colour as 0xRRGGBB
    pub background_color: u32,
    /// Fog start distance
    pub fog_near: f32,
    /// Fog end distance
    pub fog_far: f32,
    /// Ground plane side length
    pub ground_size: f32,
    /// Ground colour as 0xRRGGBB
    pub ground_color: u32,
    /// Side length of one city block
    pub block_size: f32,
    /// Lattice spacing of building sites inside a block
    pub lattice_step: f32,
    /// Chance that a lattice site holds a building
    pub building_probability: f64,
    /// Building footprint (square)
    pub building_width: f32,
    pub building_min_height: f32,
    pub building_height_range: f32,
    pub cloud_count: usize,
    pub airplane_count: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            background_color: 0x87ceeb,
            fog_near: 1.0,
            fog_far: 100.0,
            ground_size: 200.0,
            ground_color: 0x555555,
            block_size: 40.0,
            lattice_step: 8.0,
            building_probability: 0.7,
            building_width: 4.0,
            building_min_height: 5.0,
            building_height_range: 15.0,
            cloud_count: 20,
            airplane_count: 3,
        }
    }
}

/// Per-frame motion of dynamic objects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Cloud drift along +X per frame
    pub cloud_speed: f32,
    /// Cloud spin about Y per frame (radians)
    pub cloud_spin: f32,
    /// Airplane advance along +X per frame
    pub airplane_speed: f32,
    /// Objects past +wrap_limit reappear at -wrap_limit
    pub wrap_limit: f32,
    /// Amplitude of the airplane's sideways weave
    pub weave_amplitude: f32,
    pub weave_frequency: f32,
    /// Amplitude of the airplane's roll (radians)
    pub roll_amplitude: f32,
    pub roll_frequency: f32,
    /// Blocks farther than this from the camera are recycled
    pub recycle_distance: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cloud_speed: 0.05,
            cloud_spin: 0.001,
            airplane_speed: 0.2,
            wrap_limit: 50.0,
            weave_amplitude: 20.0,
            weave_frequency: 0.02,
            roll_amplitude: 0.1,
            roll_frequency: 0.1,
            recycle_distance: 80.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Ambient light intensity
    pub ambient_intensity: f32,
    /// Directional light intensity
    pub sun_intensity: f32,
    /// Directional light position; it shines towards the origin
    pub sun_position: [f32; 3],
    /// Shadow map side length in texels (0 disables shadows)
    pub shadow_map_size: u32,
    /// Half-size of the area covered by the shadow map
    pub shadow_extent: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.6,
            sun_intensity: 0.8,
            sun_position: [50.0, 50.0, 50.0],
            shadow_map_size: 2048,
            shadow_extent: 100.0,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show frame rate in the window title
    pub show_fps: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_fps: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.scene.cloud_count, 20);
        assert_eq!(config.scene.airplane_count, 3);
        assert!(config.scene.seed.is_none());
    }

    #[test]
    fn test_max_polar_angle_matches_radians() {
        let config = ControlsConfig::default();
        let radians = config.max_polar_angle.to_radians();
        assert!((radians - std::f32::consts::PI / 2.1).abs() < 1e-5);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("damping_factor"));
        assert!(toml.contains("recycle_distance"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[scene]\nseed = 7\ncloud_count = 5\n").unwrap();
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.scene.cloud_count, 5);
        assert_eq!(config.scene.airplane_count, 3);
        assert_eq!(config.window.title, "Skyline");
    }
}
