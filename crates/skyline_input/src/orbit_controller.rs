//! Orbit controller with inertial damping
//!
//! Controls:
//! - Left-click + drag: orbit around the target
//! - Right-click + drag: pan the target in the view plane
//! - Mouse wheel: zoom towards / away from the target
//!
//! Input is accumulated between frames and applied in [`OrbitController::update`].
//! With damping enabled only a fraction of the accumulated motion is applied
//! per update and the remainder decays by `1 - damping_factor`, which gives
//! the camera its glide.

use std::f32::consts::{PI, TAU};

use skyline_math::Vec3;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

const EPS: f32 = 1e-6;

/// Spherical coordinates around the Y axis
#[derive(Clone, Copy, Debug, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle measured from +Y
    phi: f32,
    /// Azimuth around +Y measured from +Z
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius: 0.0, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

/// Damped orbit controller
pub struct OrbitController {
    /// Point the camera orbits around
    pub target: Vec3,

    // Mouse state
    rotating: bool,
    panning: bool,

    // Accumulated, not yet applied motion
    delta: Spherical,
    pan_offset: Vec3,
    pending_pan: (f32, f32),
    scale: f32,

    // State captured by `save_state` for `reset`
    saved_target: Vec3,
    saved_position: Option<Vec3>,

    // Configuration
    pub enabled: bool,
    pub damping_enabled: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Viewport height in pixels; mouse deltas are measured against it
    pub viewport_height: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,

            rotating: false,
            panning: false,

            delta: Spherical { radius: 0.0, phi: 0.0, theta: 0.0 },
            pan_offset: Vec3::ZERO,
            pending_pan: (0.0, 0.0),
            scale: 1.0,

            saved_target: Vec3::ZERO,
            saved_position: None,

            enabled: true,
            damping_enabled: true,
            damping_factor: 0.05,
            min_distance: 20.0,
            max_distance: 60.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 2.1,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            viewport_height: 600.0,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
    }

    /// Process raw mouse movement in pixels
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if !self.enabled {
            return;
        }
        let (dx, dy) = (delta_x as f32, delta_y as f32);
        let height = self.viewport_height.max(1.0);

        if self.rotating {
            self.rotate_left(TAU * dx / height * self.rotate_speed);
            self.rotate_up(TAU * dy / height * self.rotate_speed);
        } else if self.panning {
            self.pending_pan.0 += dx * self.pan_speed;
            self.pending_pan.1 += dy * self.pan_speed;
        }
    }

    /// Process a wheel event; scrolling up zooms in
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
        };
        self.zoom(amount);
    }

    /// Zoom by wheel steps; only the sign of `amount` matters
    pub fn zoom(&mut self, amount: f32) {
        if !self.enabled || amount == 0.0 {
            return;
        }
        let step = self.zoom_scale();
        if amount > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Queue a rotation of the azimuth (positive turns the camera left)
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    /// Queue a rotation of the polar angle (positive tilts the camera up)
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// True while a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Remember the current camera placement for [`OrbitController::reset`]
    pub fn save_state<C: CameraControl>(&mut self, camera: &C) {
        self.saved_target = self.target;
        self.saved_position = Some(camera.position());
    }

    /// Restore the saved placement and drop any residual motion
    pub fn reset<C: CameraControl>(&mut self, camera: &mut C) {
        self.target = self.saved_target;
        if let Some(position) = self.saved_position {
            camera.set_view(position, self.target);
        }
        self.clear_motion();
        log::debug!("Orbit controls reset");
    }

    /// Apply accumulated input to the camera
    ///
    /// Returns true if the camera moved.
    pub fn update<C: CameraControl>(&mut self, camera: &mut C) -> bool {
        let position = camera.position();

        // Pan distances are scaled so the target tracks the cursor
        let (px, py) = std::mem::take(&mut self.pending_pan);
        if px != 0.0 || py != 0.0 {
            let target_distance = (position - self.target).length() * (camera.fov_y() / 2.0).tan();
            let height = self.viewport_height.max(1.0);
            self.pan(camera, 2.0 * px * target_distance / height, 2.0 * py * target_distance / height);
        }

        let mut spherical = Spherical::from_offset(position - self.target);

        let k = if self.damping_enabled { self.damping_factor } else { 1.0 };
        spherical.theta += self.delta.theta * k;
        spherical.phi += self.delta.phi * k;

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.target += self.pan_offset * k;

        let new_position = self.target + spherical.to_offset();
        camera.set_view(new_position, self.target);

        if self.damping_enabled {
            let decay = 1.0 - self.damping_factor;
            self.delta.theta *= decay;
            self.delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.delta.theta = 0.0;
            self.delta.phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        (new_position - position).length_squared() > EPS
    }

    fn pan<C: CameraControl>(&mut self, camera: &C, left: f32, up: f32) {
        let forward = (self.target - camera.position()).normalized();
        let right = forward.cross(Vec3::Y).normalized();
        let cam_up = right.cross(forward);
        self.pan_offset += right * -left;
        self.pan_offset += cam_up * up;
    }

    fn clear_motion(&mut self) {
        self.delta = Spherical { radius: 0.0, phi: 0.0, theta: 0.0 };
        self.pan_offset = Vec3::ZERO;
        self.pending_pan = (0.0, 0.0);
        self.scale = 1.0;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Builder: set the orbit target
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self.saved_target = target;
        self
    }

    /// Builder: set the damping factor (0 disables damping)
    pub fn with_damping(mut self, factor: f32) -> Self {
        self.damping_factor = factor;
        self.damping_enabled = factor > 0.0;
        self
    }

    /// Builder: set the allowed camera distance range
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self
    }

    /// Builder: set the maximum polar angle in radians
    pub fn with_max_polar_angle(mut self, angle: f32) -> Self {
        self.max_polar_angle = angle;
        self
    }

    /// Builder: set rotation speed
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set pan speed
    pub fn with_pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }
}

/// Trait for camera control
/// Allows the controller to drive different camera implementations
pub trait CameraControl {
    fn position(&self) -> Vec3;
    /// Vertical field of view in radians
    fn fov_y(&self) -> f32;
    /// Place the camera and aim it at `target`
    fn set_view(&mut self, position: Vec3, target: Vec3);
}
